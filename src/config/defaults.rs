//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Directory under the home directory holding config, preferences and logs
pub const DATA_DIR_NAME: &str = ".promptbar";

/// Config file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Half-life in days for frecency decay
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 7.0;

/// Result caps for the palette list
pub const DEFAULT_SEARCH_RESULT_LIMIT: usize = 50;
pub const DEFAULT_RECENT_LIMIT: usize = 5;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Categories offered before the user creates any
pub const DEFAULT_CATEGORIES: &[&str] = &["Work", "Personal", "Templates"];
