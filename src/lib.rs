//! promptbar - the core of a menu bar prompt palette
//!
//! This library holds everything below the UI: the prompt collection and
//! its persistence, the palette search engine, quick slots, and the
//! keyboard shortcut model.

pub mod config;
pub mod error;
pub mod logging;

// Frecency scoring for prompt usage
pub mod frecency;

// Prompt records, search and the collection owner
pub mod prompts;

// Preference store, prompt persistence, export/import and backups
pub mod storage;

// Keyboard shortcuts and bindable actions
pub mod shortcuts;
