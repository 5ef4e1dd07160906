//! Storage Layer
//!
//! Prompt and preference persistence on top of a [`PreferenceStore`].
//!
//! - `preferences` - the store trait, an in-memory store and a JSON file store
//! - `persistence` - prompt list, palette preferences, export and import
//! - `backup` - full backup and best-effort restore

mod backup;
mod persistence;
mod preferences;

pub use backup::{RestoreReport, BACKUP_VERSION};
pub use persistence::{
    decode_import, default_categories, export_prompts, merge_import, normalize_display_order,
    PromptPersistence, CATEGORIES_KEY, LAST_ACTIVE_APP_KEY, PLACEMENT_MODE_KEY, PROMPTS_KEY,
    SORT_MODE_KEY,
};
pub use preferences::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
