//! Session aggregate.
//!
//! One [`Session`] holds everything about the current round. It is replaced
//! wholesale when a round is reset, never patched field by field, and only
//! [`crate::state::machine::SessionMachine`] mutates it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::ledger::Ledger;

/// Round lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// No round loaded
    #[default]
    Idle,
    /// Clock running, matches accepted
    Active,
    /// Clock stopped, board paused
    Paused,
    /// Round concluded and persisted
    GameOver,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::GameOver => "game_over",
        }
    }

    /// A round is loaded and not yet concluded.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// The round has concluded and its record was saved.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory "next letter" shown beside the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterHint {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LetterHint {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// End-of-round verdict shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Single-player round, the board filled up
    Solo,
    /// The opponent finished (topped out) first
    Won,
    /// This player finished first
    Lost,
}

impl RoundOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

/// Snapshot handed to the score store once per concluded round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub stars: u32,
    pub duration_seconds: u64,
    pub is_multiplayer: bool,
    pub opponent_stars: u32,
    pub is_opponent_finished: bool,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

/// Render seconds as `mm:ss`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Live state of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) state: RoundState,
    pub(crate) ledger: Ledger,
    pub(crate) stars: u32,
    pub(crate) opponent_stars: u32,
    pub(crate) clock: Clock,
    pub(crate) is_multiplayer: bool,
    pub(crate) is_opponent_finished: bool,
    pub(crate) is_in_play: bool,
    pub(crate) earthquakes_left: i32,
    pub(crate) next_letter: Option<LetterHint>,
}

impl Session {
    /// An idle session with no round loaded.
    pub fn new(is_multiplayer: bool, earthquakes: u32) -> Self {
        Self {
            state: RoundState::Idle,
            ledger: Ledger::default(),
            stars: 0,
            opponent_stars: 0,
            clock: Clock::new(),
            is_multiplayer,
            is_opponent_finished: false,
            is_in_play: false,
            earthquakes_left: i32::try_from(earthquakes).unwrap_or(i32::MAX),
            next_letter: None,
        }
    }

    /// A zeroed session for a new round, built from this one.
    ///
    /// Only the multiplayer mode and the clock's token sequence carry over.
    pub(crate) fn next_round(&self, ledger: Ledger, earthquakes: u32) -> Self {
        Self {
            ledger,
            clock: self.clock.restarted(),
            ..Self::new(self.is_multiplayer, earthquakes)
        }
    }

    pub(crate) fn score_record(&self, is_opponent_finished: bool) -> ScoreRecord {
        ScoreRecord {
            stars: self.stars,
            duration_seconds: self.clock.elapsed_seconds(),
            is_multiplayer: self.is_multiplayer,
            opponent_stars: self.opponent_stars,
            is_opponent_finished,
            finished_at: chrono::Utc::now(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn opponent_stars(&self) -> u32 {
        self.opponent_stars
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_multiplayer(&self) -> bool {
        self.is_multiplayer
    }

    pub fn is_opponent_finished(&self) -> bool {
        self.is_opponent_finished
    }

    /// Set once the intro is dismissed and the player is actually playing.
    pub fn is_in_play(&self) -> bool {
        self.is_in_play
    }

    /// May go negative if a caller skips the availability check.
    pub fn earthquakes_left(&self) -> i32 {
        self.earthquakes_left
    }

    pub fn next_letter(&self) -> Option<&LetterHint> {
        self.next_letter.as_ref()
    }

    pub fn formatted_time(&self) -> String {
        format_time(self.elapsed_seconds())
    }

    pub fn outcome(&self) -> RoundOutcome {
        if !self.is_multiplayer {
            RoundOutcome::Solo
        } else if self.is_opponent_finished {
            RoundOutcome::Won
        } else {
            RoundOutcome::Lost
        }
    }

    /// Full snapshot for the UI.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state.as_str(),
            "words": self.ledger,
            "stars": self.stars,
            "opponent_stars": self.opponent_stars,
            "elapsed_seconds": self.elapsed_seconds(),
            "formatted_time": self.formatted_time(),
            "is_multiplayer": self.is_multiplayer,
            "is_opponent_finished": self.is_opponent_finished,
            "is_in_play": self.is_in_play,
            "earthquakes_left": self.earthquakes_left,
            "next_letter": self.next_letter
        })
    }
}
