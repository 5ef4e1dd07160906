//! Prompt collection: the record type, the palette search engine and the
//! library that owns and persists the collection.

mod library;
mod model;
pub mod search;

pub use library::{NewPrompt, PromptEdit, PromptLibrary};
pub use model::{PlacementMode, Prompt, PromptId, SortMode, UnknownName, QUICK_SLOT_RANGE};
pub use search::{CategoryFilter, SearchQuery};
