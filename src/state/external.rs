//! Collaborators the session drives but does not own.

use super::session::ScoreRecord;

/// The letter board: grid rendering and input capture live behind this.
pub trait Board {
    /// Lay out a fresh board hiding these words.
    fn create_board(&mut self, words: &[String]);

    fn clear_board(&mut self);

    fn toggle_game_pause(&mut self, paused: bool);
}

/// Persisted scores.
pub trait ScoreStore {
    /// Called exactly once per concluded round.
    fn save_new_score(&mut self, record: ScoreRecord);
}

impl ScoreStore for Vec<ScoreRecord> {
    fn save_new_score(&mut self, record: ScoreRecord) {
        self.push(record);
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum BoardCall {
        Create(Vec<String>),
        Clear,
        Pause(bool),
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingBoard {
        pub calls: Rc<RefCell<Vec<BoardCall>>>,
    }

    impl Board for RecordingBoard {
        fn create_board(&mut self, words: &[String]) {
            self.calls.borrow_mut().push(BoardCall::Create(words.to_vec()));
        }

        fn clear_board(&mut self) {
            self.calls.borrow_mut().push(BoardCall::Clear);
        }

        fn toggle_game_pause(&mut self, paused: bool) {
            self.calls.borrow_mut().push(BoardCall::Pause(paused));
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingStore {
        pub records: Rc<RefCell<Vec<ScoreRecord>>>,
    }

    impl ScoreStore for RecordingStore {
        fn save_new_score(&mut self, record: ScoreRecord) {
            self.records.borrow_mut().push(record);
        }
    }
}
