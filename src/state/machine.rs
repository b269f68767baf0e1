//! Session state machine.
//!
//! Owns the live [`Session`] and every collaborator it drives. All mutation
//! of a round goes through here.
//!
//! # State Diagram
//!
//! ```text
//! ┌──────┐ initialize ┌────────┐ pause_game  ┌────────┐
//! │ Idle │───────────▶│ Active │────────────▶│ Paused │
//! └──────┘            └───┬────┘◀────────────└───┬────┘
//!                         │       resume_game    │
//!                         │ handle_gameover /    │
//!                         │ opponent finished    │
//!                         ▼                      │
//!                    ┌──────────┐                │
//!                    │ GameOver │◀───────────────┘
//!                    └────┬─────┘
//!                         │ retry (reset_values + initialize)
//!                         ▼
//!                      Active
//! ```
//!
//! A round is concluded, and its [`ScoreRecord`] persisted, exactly once:
//! either by the local `handle_gameover` or by the first opponent status
//! reporting `is_gameovered`, whichever is processed first.

use tracing::{debug, info, instrument, trace, warn};

use crate::config::GameConfig;

use super::clock::{Tick, TickToken};
use super::external::{Board, ScoreStore};
use super::ledger::{Ledger, LedgerError};
use super::scoring::ScoringRule;
use super::session::{LetterHint, RoundOutcome, RoundState, ScoreRecord, Session};
use super::sync::{NoSync, OpponentSync, PeerMessage, PeerStatus};
use super::word_sets::{WordSetError, WordSetSource, WordSets};

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {operation} while round is {state}")]
    InvalidState {
        operation: &'static str,
        state: RoundState,
    },
    /// A second conclusion was attempted for a round already over.
    #[error("round has already concluded")]
    DuplicateConclusion,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    WordSet(#[from] WordSetError),
    #[error("malformed peer message: {0}")]
    PeerMessage(#[from] serde_json::Error),
}

/// Returned when a round concludes; the caller presents the end-of-round view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEnd {
    pub record: ScoreRecord,
    pub outcome: RoundOutcome,
}

/// Round lifecycle, scoring and opponent reconciliation.
pub struct SessionMachine {
    session: Session,
    rule: ScoringRule,
    earthquakes: u32,
    board: Box<dyn Board>,
    store: Box<dyn ScoreStore>,
    sync: Box<dyn OpponentSync>,
    words: Box<dyn WordSetSource>,
}

impl std::fmt::Debug for SessionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMachine")
            .field("session", &self.session)
            .field("rule", &self.rule)
            .field("earthquakes", &self.earthquakes)
            .finish_non_exhaustive()
    }
}

impl SessionMachine {
    /// Create an idle single-player machine.
    pub fn new(
        config: &GameConfig,
        board: impl Board + 'static,
        store: impl ScoreStore + 'static,
        words: impl WordSetSource + 'static,
    ) -> Self {
        Self {
            session: Session::new(false, config.earthquakes),
            rule: config.scoring,
            earthquakes: config.earthquakes,
            board: Box::new(board),
            store: Box::new(store),
            sync: Box::new(NoSync),
            words: Box::new(words),
        }
    }

    /// Create an idle single-player machine drawing from `config.word_sets_path`.
    pub fn from_config(
        config: &GameConfig,
        board: impl Board + 'static,
        store: impl ScoreStore + 'static,
    ) -> Result<Self, SessionError> {
        let path = config
            .word_sets_path
            .as_ref()
            .ok_or(WordSetError::Unconfigured)?;
        let words = WordSets::load(path)?;
        debug!(path = %path.display(), sets = words.sets().len(), "word sets loaded");
        Ok(Self::new(config, board, store, words))
    }

    /// Use `sync` for opponent mirroring; a connected sync makes rounds two-player.
    pub fn with_sync(mut self, sync: impl OpponentSync + 'static) -> Self {
        self.install_sync(Box::new(sync));
        self
    }

    /// Switch between single- and two-player between rounds.
    pub fn set_sync(&mut self, sync: impl OpponentSync + 'static) -> Result<(), SessionError> {
        self.require(!self.session.state.is_live(), "change player mode")?;
        self.install_sync(Box::new(sync));
        Ok(())
    }

    fn install_sync(&mut self, sync: Box<dyn OpponentSync>) {
        self.session.is_multiplayer = sync.is_connected();
        self.sync = sync;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> RoundState {
        self.session.state
    }

    fn require(&self, allowed: bool, operation: &'static str) -> Result<(), SessionError> {
        if allowed {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.session.state,
            })
        }
    }

    /// Replace the session with a zeroed one over a newly drawn word set.
    ///
    /// Leaves the round `Idle`; the clock is stopped and any outstanding
    /// tick token becomes stale.
    pub fn reset_values(&mut self) -> Result<(), SessionError> {
        let words = self.words.draw()?;
        self.board.clear_board();
        self.session = self
            .session
            .next_round(Ledger::load(words), self.earthquakes);
        debug!(words = self.session.ledger.len(), "session reset");
        Ok(())
    }

    /// Start a round: reset, lay out the board, start the clock.
    ///
    /// From a live round this forcibly restarts it. The returned token is the
    /// one ticks must carry.
    pub fn initialize(&mut self) -> Result<TickToken, SessionError> {
        self.reset_values()?;
        self.board.create_board(&self.session.ledger.texts());
        let token = self.session.clock.start();
        self.session.state = RoundState::Active;
        info!(
            words = self.session.ledger.len(),
            multiplayer = self.session.is_multiplayer,
            "round started"
        );
        Ok(token)
    }

    /// Mark the round as actually being played (intro dismissed).
    pub fn change_game_status(&mut self) -> Result<(), SessionError> {
        self.require(self.session.state.is_live(), "change game status")?;
        self.session.is_in_play = true;
        Ok(())
    }

    /// Replace the advisory next-letter value.
    pub fn update_next_letter_hint(&mut self, letter: LetterHint) {
        self.session.next_letter = Some(letter);
    }

    /// Spend one earthquake and return how many remain.
    ///
    /// Callers check availability first; the counter is not clamped.
    pub fn decrease_earthquake(&mut self) -> Result<i32, SessionError> {
        self.require(self.session.state == RoundState::Active, "use an earthquake")?;
        self.session.earthquakes_left -= 1;
        if self.session.earthquakes_left < 0 {
            warn!(
                left = self.session.earthquakes_left,
                "earthquake used with none remaining"
            );
        }
        Ok(self.session.earthquakes_left)
    }

    /// Score a batch of matched words reported by the board.
    pub fn apply_matches<S: AsRef<str>>(&mut self, matched: &[S]) -> Result<u32, SessionError> {
        self.require(self.session.state.is_live(), "apply matches")?;
        let delta = self
            .rule
            .apply_matches(&mut self.session, matched, self.sync.as_mut())?;
        Ok(delta)
    }

    /// Deliver one clock tick.
    pub fn tick(&mut self, token: TickToken) -> Tick {
        let tick = self.session.clock.tick(token);
        match tick {
            Tick::Counted(elapsed) => trace!(elapsed, "tick"),
            Tick::Stale => trace!(token = token.id(), "stale tick discarded"),
        }
        tick
    }

    /// Stop the clock and pause the board. Pausing twice is a no-op.
    pub fn pause_game(&mut self) -> Result<(), SessionError> {
        match self.session.state {
            RoundState::Paused => {
                debug!("already paused");
                Ok(())
            }
            RoundState::Active => {
                self.session.clock.pause();
                self.board.toggle_game_pause(true);
                self.session.state = RoundState::Paused;
                debug!(elapsed = self.session.elapsed_seconds(), "round paused");
                Ok(())
            }
            _ => self.require(false, "pause"),
        }
    }

    /// Restart the clock from its current value and unpause the board.
    pub fn resume_game(&mut self) -> Result<TickToken, SessionError> {
        match (self.session.state, self.session.clock.active_token()) {
            (RoundState::Active, Some(token)) => {
                debug!("already running");
                Ok(token)
            }
            (RoundState::Paused, _) => {
                let token = self.session.clock.resume();
                self.board.toggle_game_pause(false);
                self.session.state = RoundState::Active;
                debug!(elapsed = self.session.elapsed_seconds(), "round resumed");
                Ok(token)
            }
            _ => Err(SessionError::InvalidState {
                operation: "resume",
                state: self.session.state,
            }),
        }
    }

    /// Conclude the round locally (the board filled up).
    #[instrument(skip(self))]
    pub fn handle_gameover(&mut self) -> Result<RoundEnd, SessionError> {
        if self.session.state.is_terminal() {
            return Err(SessionError::DuplicateConclusion);
        }
        self.require(self.session.state.is_live(), "end the round")?;

        self.session.state = RoundState::GameOver;
        self.session.is_in_play = false;
        self.session.clock.stop();

        let record = self.session.score_record(false);
        self.store.save_new_score(record.clone());
        self.sync
            .push_status(PeerStatus::finished(self.session.stars));

        info!(
            elapsed = record.duration_seconds,
            opponent_stars = record.opponent_stars,
            "round over"
        );
        Ok(RoundEnd {
            record,
            outcome: self.session.outcome(),
        })
    }

    /// Ingest the opponent's status.
    ///
    /// The first status reporting `is_gameovered` during a live round ends
    /// it; later or duplicate ones only refresh `opponent_stars`.
    #[instrument(skip(self))]
    pub fn handle_opponent_status(
        &mut self,
        status: PeerStatus,
    ) -> Result<Option<RoundEnd>, SessionError> {
        if !self.session.is_multiplayer {
            debug!("single-player round, ignoring opponent status");
            return Ok(None);
        }

        self.session.opponent_stars = status.stars;

        if !status.is_gameovered {
            return Ok(None);
        }
        if !self.session.state.is_live() || self.session.is_opponent_finished {
            debug!(state = %self.session.state, "round already concluded, opponent finish absorbed");
            return Ok(None);
        }

        self.session.clock.pause();
        self.board.toggle_game_pause(true);
        self.session.is_opponent_finished = true;
        self.session.is_in_play = false;
        self.session.state = RoundState::GameOver;

        let record = self.session.score_record(true);
        self.store.save_new_score(record.clone());

        info!(
            stars = record.stars,
            elapsed = record.duration_seconds,
            "opponent finished, round over"
        );
        Ok(Some(RoundEnd {
            record,
            outcome: self.session.outcome(),
        }))
    }

    /// Decode an inbound wire message and hand it to [`Self::handle_opponent_status`].
    pub fn receive_peer_message(&mut self, raw: &str) -> Result<Option<RoundEnd>, SessionError> {
        let message = PeerMessage::from_json(raw)?;
        self.handle_opponent_status(message.status())
    }

    /// Start over after a concluded round.
    pub fn retry(&mut self) -> Result<TickToken, SessionError> {
        self.require(self.session.state == RoundState::GameOver, "retry")?;
        info!("retrying");
        self.initialize()
    }
}
