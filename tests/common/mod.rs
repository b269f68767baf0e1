use std::cell::RefCell;
use std::rc::Rc;

use wordrace_state::config::GameConfig;
use wordrace_state::state::{
    Board, ChannelSync, PeerMessage, RotatingWordSets, ScoreRecord, ScoreStore, SessionMachine,
    Transport, TransportError, WordSpec,
};

#[derive(Debug, Clone, Default)]
pub struct CountingBoard {
    pub created: Rc<RefCell<Vec<Vec<String>>>>,
    pub paused: Rc<RefCell<Vec<bool>>>,
}

impl Board for CountingBoard {
    fn create_board(&mut self, words: &[String]) {
        self.created.borrow_mut().push(words.to_vec());
    }

    fn clear_board(&mut self) {}

    fn toggle_game_pause(&mut self, paused: bool) {
        self.paused.borrow_mut().push(paused);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    pub records: Rc<RefCell<Vec<ScoreRecord>>>,
}

impl ScoreStore for SharedStore {
    fn save_new_score(&mut self, record: ScoreRecord) {
        self.records.borrow_mut().push(record);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pub messages: Rc<RefCell<Vec<PeerMessage>>>,
}

impl Transport for Outbox {
    fn send(&mut self, message: &PeerMessage) -> Result<(), TransportError> {
        self.messages.borrow_mut().push(*message);
        Ok(())
    }
}

pub struct Harness {
    pub machine: SessionMachine,
    pub board: CountingBoard,
    pub store: SharedStore,
    pub outbox: Outbox,
}

pub fn scenario_sets() -> RotatingWordSets {
    RotatingWordSets::new(vec![
        vec![WordSpec::main("car"), WordSpec::sub("art")],
        vec![WordSpec::main("tree"), WordSpec::sub("tee"), WordSpec::sub("ret")],
    ])
    .unwrap()
}

pub fn harness(multiplayer: bool) -> Harness {
    let board = CountingBoard::default();
    let store = SharedStore::default();
    let outbox = Outbox::default();
    let mut machine = SessionMachine::new(
        &GameConfig::default(),
        board.clone(),
        store.clone(),
        scenario_sets(),
    );
    if multiplayer {
        machine = machine.with_sync(ChannelSync::new(outbox.clone()));
    }
    Harness {
        machine,
        board,
        store,
        outbox,
    }
}
