//! State management module for WordRace.
//!
//! This module provides the core state types:
//!
//! - `ledger` - Target words for the round and their match counts
//! - `clock` - Elapsed-time counter with pause/resume and stale-tick rejection
//! - `scoring` - Main/sub word weights and batch scoring
//! - `session` - The round aggregate and its score snapshot
//! - `machine` - Round lifecycle state machine
//! - `sync` - Opponent status mirroring
//! - `external` - Board and score store collaborators
//! - `word_sets` - Word-set sources
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                          SessionMachine                               │
//! │                                                                       │
//! │  ┌───────────────────────────────────────┐   ┌────────────────────┐   │
//! │  │               Session                 │   │   OpponentSync     │   │
//! │  │                                       │   │  (NoSync |         │   │
//! │  │  Ledger ─ words, counts               │   │   ChannelSync)     │   │
//! │  │  Clock  ─ elapsed, active token       │   └────────────────────┘   │
//! │  │  stars, opponent_stars, flags         │   ┌────────────────────┐   │
//! │  └───────────────────────────────────────┘   │ Board, ScoreStore, │   │
//! │                     ▲                        │ WordSetSource      │   │
//! │                     │ ScoringRule            └────────────────────┘   │
//! │                     │ apply_matches                                   │
//! │                                                                       │
//! │   Idle ──▶ Active ◀──▶ Paused ──▶ GameOver ──retry──▶ Active          │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use wordrace_state::state::{SessionMachine, WordSets, ChannelSync};
//!
//! let mut machine = SessionMachine::new(&config, board, store, WordSets::load(path)?)
//!     .with_sync(ChannelSync::new(transport));
//! let token = machine.initialize()?;
//! machine.tick(token);
//! machine.apply_matches(&["car", "art"])?;
//! ```

pub mod clock;
pub mod external;
pub mod ledger;
pub mod machine;
pub mod scoring;
pub mod session;
pub mod sync;
pub mod word_sets;

// Re-export commonly used types
pub use clock::{Clock, Tick, TickToken};
pub use external::{Board, ScoreStore};
pub use ledger::{Ledger, LedgerError, Word, WordSpec};
pub use machine::{RoundEnd, SessionError, SessionMachine};
pub use scoring::{ScoringRule, MAIN_POINT, SUB_POINT};
pub use session::{format_time, LetterHint, RoundOutcome, RoundState, ScoreRecord, Session};
pub use sync::{
    ChannelSync, NoSync, OpponentSync, PeerMessage, PeerStatus, Transport, TransportError,
    DETAILS_SET_EVENT,
};
pub use word_sets::{RotatingWordSets, WordSetError, WordSetSource, WordSets};
