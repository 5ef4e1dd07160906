//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;
use super::loader::default_data_dir;

/// Application configuration, read from `~/.promptbar/config.json`.
///
/// Every field is optional in the file; missing values take the defaults
/// from [`super::defaults`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where preferences and logs live (default: ~/.promptbar)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Frecency half-life in days (default: 7.0)
    /// Lower values favour recently used prompts, higher values favour frequent ones
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,
    /// Cap on palette results when searching (default: 50)
    #[serde(default = "default_search_result_limit")]
    pub search_result_limit: usize,
    /// Number of entries in the recent list (default: 5)
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Number of search suggestions offered (default: 5)
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// Tracing filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_half_life_days() -> f64 {
    DEFAULT_HALF_LIFE_DAYS
}
fn default_search_result_limit() -> usize {
    DEFAULT_SEARCH_RESULT_LIMIT
}
fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}
fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
            search_result_limit: DEFAULT_SEARCH_RESULT_LIMIT,
            recent_limit: DEFAULT_RECENT_LIMIT,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Resolved data directory; a configured path has `~` expanded.
    pub fn data_dir(&self) -> PathBuf {
        match self.data_dir.as_deref() {
            Some(raw) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
            None => default_data_dir(),
        }
    }

    /// File backing the preference store.
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir().join("preferences.json")
    }

    /// Directory for JSONL logs.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Half-life guarded against zero or negative values.
    pub fn effective_half_life_days(&self) -> f64 {
        if self.half_life_days.is_finite() && self.half_life_days > 0.0 {
            self.half_life_days
        } else {
            DEFAULT_HALF_LIFE_DAYS
        }
    }
}
