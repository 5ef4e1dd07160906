//! Configuration loading from file system

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::{CONFIG_FILE_NAME, DATA_DIR_NAME};
use super::types::Config;

/// Default data directory (~/.promptbar/), or a temp directory when there is no home.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DATA_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("promptbar"))
}

/// Default config file path (~/.promptbar/config.json).
pub fn default_config_path() -> PathBuf {
    default_data_dir().join(CONFIG_FILE_NAME)
}

/// Load configuration from `path`.
///
/// Returns Config::default() if the file is missing, unreadable, or not
/// valid config JSON.
#[instrument(name = "load_config")]
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(config) => {
            info!(path = %path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}
