//! Scoring.
//!
//! Main words are worth more than sub words. A batch of matches is scored as
//! one update: if any word in it is unknown, nothing is applied.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ledger::LedgerError;
use super::session::Session;
use super::sync::{OpponentSync, PeerStatus};

/// Points for matching a main word.
pub const MAIN_POINT: u32 = 3;

/// Points for matching a sub word.
pub const SUB_POINT: u32 = 1;

/// Point weights per word class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub main_point: u32,
    pub sub_point: u32,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            main_point: MAIN_POINT,
            sub_point: SUB_POINT,
        }
    }
}

impl ScoringRule {
    pub fn new(main_point: u32, sub_point: u32) -> Self {
        Self {
            main_point,
            sub_point,
        }
    }

    pub fn point(&self, is_main: bool) -> u32 {
        if is_main {
            self.main_point
        } else {
            self.sub_point
        }
    }

    /// Score a batch of matched words and return the delta.
    ///
    /// Totals saturate at `u32::MAX`.
    /// The updated total is pushed to the opponent through `sync`.
    pub fn apply_matches<S: AsRef<str>>(
        &self,
        session: &mut Session,
        matched: &[S],
        sync: &mut dyn OpponentSync,
    ) -> Result<u32, LedgerError> {
        let indices = matched
            .iter()
            .map(|text| session.ledger.position(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let delta = indices.into_iter().fold(0u32, |delta, index| {
            delta.saturating_add(self.point(session.ledger.bump(index)))
        });

        session.stars = session.stars.saturating_add(delta);
        debug!(delta, stars = session.stars, words = matched.len(), "applied matches");

        sync.push_status(PeerStatus::playing(session.stars));
        Ok(delta)
    }
}
