//! Round clock.
//!
//! The clock does not own a timer. Each `start`/`resume` opens a new tick
//! source identified by a [`TickToken`]; whatever drives time (see
//! [`crate::runtime::spawn_ticker`]) delivers ticks carrying that token.
//! Ticks whose token is no longer the active source are stale and dropped,
//! so at most one source can ever advance the counter.

use serde::{Deserialize, Serialize};

/// Identifies one tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

impl TickToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What happened to a delivered tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Counter advanced to this value.
    Counted(u64),
    /// Token was cancelled or superseded; tick discarded.
    Stale,
}

/// Elapsed-seconds counter with pause/resume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clock {
    elapsed_seconds: u64,
    active: Option<TickToken>,
    /// Last token handed out. Survives [`Clock::restarted`] so tokens from an
    /// earlier round never match a later one.
    last_issued: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopped clock at zero that keeps this clock's token sequence.
    pub fn restarted(&self) -> Self {
        Self {
            elapsed_seconds: 0,
            active: None,
            last_issued: self.last_issued,
        }
    }

    /// Begin ticking from the current value.
    ///
    /// Any source already running is cancelled first.
    pub fn start(&mut self) -> TickToken {
        self.stop();
        self.last_issued += 1;
        let token = TickToken(self.last_issued);
        self.active = Some(token);
        token
    }

    /// Stop ticking, keeping the counter. No-op when already stopped.
    pub fn pause(&mut self) {
        self.stop();
    }

    /// Restart ticking from the current value.
    pub fn resume(&mut self) -> TickToken {
        self.start()
    }

    /// Cancel the active source, if any. Idempotent.
    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Deliver one tick.
    pub fn tick(&mut self, token: TickToken) -> Tick {
        if self.active != Some(token) {
            return Tick::Stale;
        }
        self.elapsed_seconds += 1;
        Tick::Counted(self.elapsed_seconds)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_token(&self) -> Option<TickToken> {
        self.active
    }
}
