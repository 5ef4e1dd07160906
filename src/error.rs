//! Error taxonomy for promptbar.
//!
//! Reads of stored prompts, preferences and bindings never fail: they fall
//! back to defaults and log through [`ResultExt`]. Explicit transfer
//! operations (export, import, backup) return [`TransferError`] so the
//! caller can tell the user what went wrong.

use thiserror::Error;
use tracing::{error, warn};

use crate::prompts::PromptId;

/// Failure writing to a preference store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write preferences to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of export, import and backup.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("there are no prompts to export")]
    NothingToExport,

    #[error("import data is empty")]
    EmptyInput,

    #[error("import data is not valid JSON: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("import data does not contain a list of prompts: {0}")]
    SchemaMismatch(#[source] serde_json::Error),

    #[error("backup file could not be read: {0}")]
    MalformedBackup(#[source] serde_json::Error),

    #[error("failed to encode data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransferError {
    /// Short message suitable for an alert or CLI output.
    pub fn user_message(&self) -> String {
        match self {
            Self::NothingToExport => "Nothing to export yet.".to_string(),
            Self::EmptyInput => "The selected file is empty.".to_string(),
            Self::MalformedInput(_) => "The selected file is not valid JSON.".to_string(),
            Self::SchemaMismatch(_) => {
                "The selected file does not look like a prompt export.".to_string()
            }
            Self::MalformedBackup(_) => "The backup file is damaged.".to_string(),
            Self::Encode(e) => format!("Could not encode data: {}", e),
            Self::Store(e) => format!("Could not save: {}", e),
        }
    }
}

/// Failures of prompt library mutations.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("no prompt with id {0}")]
    UnknownPrompt(PromptId),

    #[error("quick slot {0} is out of range (1-9)")]
    InvalidQuickSlot(u8),

    #[error("prompt {0} is archived")]
    ArchivedPrompt(PromptId),

    #[error("category name is empty")]
    EmptyCategoryName,

    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the caller falls back to a default.
///
/// # Examples
///
/// ```ignore
/// use promptbar::error::ResultExt;
///
/// let prompts = serde_json::from_str::<Vec<Prompt>>(&raw).warn_on_err().unwrap_or_default();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_ext_passes_values_through() {
        let ok: Result<u32, String> = Ok(3);
        assert_eq!(ok.warn_on_err(), Some(3));
        let err: Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.log_err(), None);
    }

    #[test]
    fn transfer_errors_are_distinct() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let msg = TransferError::MalformedInput(malformed).user_message();
        assert!(msg.contains("not valid JSON"));
        assert_ne!(
            TransferError::EmptyInput.user_message(),
            TransferError::NothingToExport.user_message()
        );
    }
}
