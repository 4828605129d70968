//! Engine tunables.
//!
//! Defaults reproduce the stock behaviour; hosts may override any subset from
//! a JSON document.

use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::{PediatricRule, PEDIATRIC_THRESHOLD, PEDIATRIC_UNIT};

/// Queries shorter than this (after trimming) never reach the remote search.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// Debounce window before a remote search is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Maximum number of remote results kept.
pub const DEFAULT_REMOTE_CAP: usize = 30;

/// Text that is clearly past the name stage: units, schedule codes, the separator.
pub const DEFAULT_EXTRAS_PATTERN: &str =
    r"\bmg\b|\bml\b|\bmcg\b|\bg\b|\btab\b|\bcaps?\b|\b1-0-1\b|\b101\b|•";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid extras pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for one entry field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub min_query_len: usize,
    pub debounce_ms: u64,
    pub remote_cap: usize,
    pub pediatric_unit: String,
    pub pediatric_threshold: f64,
    /// Case-insensitive regex; a match skips the remote search
    pub extras_pattern: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            remote_cap: DEFAULT_REMOTE_CAP,
            pediatric_unit: PEDIATRIC_UNIT.to_string(),
            pediatric_threshold: PEDIATRIC_THRESHOLD,
            extras_pattern: DEFAULT_EXTRAS_PATTERN.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load overrides from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.remote_cap == 0 {
            return Err(ConfigError::Invalid("remote_cap must be positive".into()));
        }
        if !self.pediatric_threshold.is_finite() || self.pediatric_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "pediatric_threshold must be a non-negative number, got {}",
                self.pediatric_threshold
            )));
        }
        if self.pediatric_unit.trim().is_empty() {
            return Err(ConfigError::Invalid("pediatric_unit must not be empty".into()));
        }
        self.extras_regex()?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn pediatric_rule(&self) -> PediatricRule {
        PediatricRule::new(&self.pediatric_unit, self.pediatric_threshold)
    }

    /// Compile the extras pattern.
    pub fn extras_regex(&self) -> ConfigResult<Regex> {
        Ok(RegexBuilder::new(&self.extras_pattern)
            .case_insensitive(true)
            .build()?)
    }
}
