//! Game configuration.
//!
//! Read from a TOML file. Missing keys fall back to the stock values; a
//! missing file yields the full default configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::state::scoring::{ScoringRule, MAIN_POINT, SUB_POINT};

/// Earthquakes available at the start of each round.
pub const EARTHQUAKES_COUNT: u32 = 3;

/// Upper bound accepted for a word's point value.
pub const MAX_POINT: u32 = 1000;

/// Upper bound accepted for earthquakes per round.
pub const MAX_EARTHQUAKES: u32 = 99;

/// Clock tick period, milliseconds.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Default log filter.
pub const DEFAULT_LOG_FILTER: &str = "wordrace_state=info";

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub scoring: ScoringRule,
    pub earthquakes: u32,
    pub tick_interval: Duration,
    pub word_sets_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    round: TomlRound,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_main_point")]
    main_point: u32,
    #[serde(default = "default_sub_point")]
    sub_point: u32,
}

#[derive(Deserialize, Debug)]
struct TomlRound {
    #[serde(default = "default_earthquakes")]
    earthquakes: u32,
    #[serde(default = "default_tick_interval")]
    tick_interval_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    word_sets: Option<String>,
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

// ── Defaults ──

fn default_main_point() -> u32 { MAIN_POINT }
fn default_sub_point() -> u32 { SUB_POINT }
fn default_earthquakes() -> u32 { EARTHQUAKES_COUNT }
fn default_tick_interval() -> u64 { TICK_INTERVAL_MS }
fn default_log_filter() -> String { DEFAULT_LOG_FILTER.into() }

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring {
            main_point: default_main_point(),
            sub_point: default_sub_point(),
        }
    }
}

impl Default for TomlRound {
    fn default() -> Self {
        TomlRound {
            earthquakes: default_earthquakes(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            word_sets: None,
            log_filter: default_log_filter(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    fn from_toml(cfg: TomlConfig) -> Self {
        GameConfig {
            scoring: ScoringRule::new(cfg.scoring.main_point, cfg.scoring.sub_point),
            earthquakes: cfg.round.earthquakes,
            tick_interval: Duration::from_millis(cfg.round.tick_interval_ms),
            word_sets_path: cfg.general.word_sets.map(PathBuf::from),
            log_filter: cfg.general.log_filter,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml(toml::from_str::<TomlConfig>(text)?);
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.main_point <= self.scoring.sub_point {
            return Err(ConfigError::Invalid("main_point must exceed sub_point"));
        }
        if self.scoring.main_point > MAX_POINT {
            return Err(ConfigError::Invalid("main_point is out of range"));
        }
        if self.earthquakes > MAX_EARTHQUAKES {
            return Err(ConfigError::Invalid("earthquakes is out of range"));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive"));
        }
        Ok(())
    }
}
