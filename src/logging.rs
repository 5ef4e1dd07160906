//! Structured JSONL logging to a file plus compact human-readable stderr.
//!
//! - **JSONL to file** (`<data_dir>/logs/promptbar.jsonl`) for tooling
//! - **Compact to stderr** for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use promptbar::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&config);
//!
//! tracing::info!(event_type = "app_start", "Application started");
//! ```
//!
//! Each file line is one JSON object:
//! ```json
//! {"timestamp":"2025-01-04T10:30:45.123Z","level":"INFO","target":"promptbar::storage","fields":{"message":"Loaded prompts","count":12}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

const LOG_FILE_NAME: &str = "promptbar.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Path of the JSONL file, if one could be opened.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}

/// Path of the JSONL log file for `config`.
pub fn log_path(config: &Config) -> PathBuf {
    config.log_dir().join(LOG_FILE_NAME)
}

/// Initialize file + stderr logging.
///
/// `RUST_LOG` overrides the configured level. If the log file cannot be
/// opened, only stderr logging is installed.
pub fn init(config: &Config) -> LoggingGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let path = log_path(config);
    let file = fs::create_dir_all(config.log_dir()).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    });

    let (file_writer, file_guard, open_error) = match file {
        // Non-blocking writer so logging never stalls the caller
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            (Some(writer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    // JSONL layer for the log file; absent when the file could not be opened
    let json_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
    });

    // Compact layer for stderr (human developers)
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init();

    match open_error {
        None => {
            tracing::info!(
                event_type = "app_lifecycle",
                action = "started",
                log_path = %path.display(),
                "Logging initialized"
            );
            LoggingGuard {
                _file_guard: file_guard,
                log_path: Some(path),
            }
        }
        Some(e) => {
            tracing::warn!(
                log_path = %path.display(),
                error = %e,
                "Failed to open log file, logging to stderr only"
            );
            LoggingGuard {
                _file_guard: None,
                log_path: None,
            }
        }
    }
}
