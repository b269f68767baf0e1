//! WordRace State Library
//!
//! This crate provides round state management for the WordRace word-search
//! game.
//!
//! # Overview
//!
//! - **Session State Machine** - Round lifecycle (idle, active, paused, game
//!   over) with validated transitions and a single conclusion per round.
//!
//! - **Scoring** - Matched-word batches are scored atomically; main words are
//!   worth more than sub words.
//!
//! - **Clock** - Elapsed seconds with pause/resume. Ticks from a cancelled or
//!   superseded source are discarded.
//!
//! - **Opponent Sync** - In two-player rounds, status is mirrored to the peer
//!   and the peer's finish ends the local round.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - Calls from the wrong state are
//!    rejected with a clear error.
//!
//! 2. **Collaborators are injected** - Board, score store, word sets and the
//!    peer transport are traits; single-player uses a no-op sync.
//!
//! 3. **One event at a time** - The [`runtime`] queue applies events in
//!    arrival order, each to completion.
//!
//! 4. **Serialization-ready** - Snapshots and wire messages convert to JSON.
//!
//! # Example
//!
//! ```rust
//! use wordrace_state::config::GameConfig;
//! use wordrace_state::state::{
//!     Board, RotatingWordSets, RoundState, ScoreRecord, SessionMachine, WordSpec,
//! };
//!
//! struct NullBoard;
//!
//! impl Board for NullBoard {
//!     fn create_board(&mut self, _words: &[String]) {}
//!     fn clear_board(&mut self) {}
//!     fn toggle_game_pause(&mut self, _paused: bool) {}
//! }
//!
//! let words = RotatingWordSets::new(vec![vec![WordSpec::main("car"), WordSpec::sub("art")]]).unwrap();
//! let mut machine = SessionMachine::new(&GameConfig::default(), NullBoard, Vec::<ScoreRecord>::new(), words);
//!
//! let token = machine.initialize().unwrap();
//! machine.tick(token);
//! machine.apply_matches(&["art", "car"]).unwrap();
//!
//! let end = machine.handle_gameover().unwrap();
//! assert_eq!(machine.state(), RoundState::GameOver);
//! assert_eq!(end.record.stars, 4);
//! assert_eq!(end.record.duration_seconds, 1);
//! ```

pub mod config;
pub mod logging;
pub mod runtime;
pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
