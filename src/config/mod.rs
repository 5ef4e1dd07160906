//! Configuration module - Application settings
//!
//! - `defaults` - All default constant values
//! - `types` - The `Config` struct
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_CATEGORIES, DEFAULT_HALF_LIFE_DAYS, DEFAULT_RECENT_LIMIT,
    DEFAULT_SEARCH_RESULT_LIMIT, DEFAULT_SUGGESTION_LIMIT,
};

pub use types::Config;

pub use loader::{default_config_path, default_data_dir, load_config};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
