//! Prompt persistence over an injected [`PreferenceStore`].
//!
//! Reads never fail: absent or undecodable data falls back to a default and
//! is logged. Export and import are explicit user actions and report
//! [`TransferError`]s instead.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::DEFAULT_CATEGORIES;
use crate::error::{ResultExt, StoreError, TransferError};
use crate::prompts::{PlacementMode, Prompt, SortMode};

use super::preferences::PreferenceStore;

pub const PROMPTS_KEY: &str = "prompts";
pub const PLACEMENT_MODE_KEY: &str = "placementMode";
pub const LAST_ACTIVE_APP_KEY: &str = "lastActiveApp";
pub const SORT_MODE_KEY: &str = "sortMode";
pub const CATEGORIES_KEY: &str = "categories";

/// Reads and writes prompts and palette preferences.
pub struct PromptPersistence<S: PreferenceStore> {
    store: Arc<S>,
}

impl<S: PreferenceStore> Clone for PromptPersistence<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PreferenceStore> PromptPersistence<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Serialize `value` as JSON under `key`.
    pub(crate) fn put_json<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, json)
    }

    #[instrument(name = "prompts_save", skip_all, fields(count = prompts.len()))]
    pub fn save(&self, prompts: &[Prompt]) -> Result<(), StoreError> {
        self.put_json(PROMPTS_KEY, prompts)?;
        debug!(count = prompts.len(), "Saved prompts");
        Ok(())
    }

    /// Load the stored prompt list.
    ///
    /// Legacy lists where every record has display order 0 get sequential
    /// orders in stored order, and the fix is written back.
    #[instrument(name = "prompts_load", skip(self))]
    pub fn load(&self) -> Vec<Prompt> {
        let Some(raw) = self.store.get(PROMPTS_KEY) else {
            info!("No stored prompts, starting empty");
            return Vec::new();
        };

        let mut prompts: Vec<Prompt> = match serde_json::from_str(&raw) {
            Ok(prompts) => prompts,
            Err(e) => {
                warn!(error = %e, "Failed to decode stored prompts, starting empty");
                return Vec::new();
            }
        };

        if normalize_display_order(&mut prompts) {
            info!(count = prompts.len(), "Assigned display order to legacy prompts");
            self.save(&prompts).log_err();
        }

        info!(count = prompts.len(), "Loaded prompts");
        prompts
    }

    fn get_parsed<T: FromStr + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, "Unrecognized preference value, using default");
                T::default()
            }),
            None => T::default(),
        }
    }

    pub fn placement_mode(&self) -> PlacementMode {
        self.get_parsed(PLACEMENT_MODE_KEY)
    }

    pub fn set_placement_mode(&self, mode: PlacementMode) -> Result<(), StoreError> {
        self.store.set(PLACEMENT_MODE_KEY, mode.name().to_string())
    }

    /// Bundle identifier of the app that was frontmost before the palette opened.
    pub fn last_active_app(&self) -> String {
        self.store.get(LAST_ACTIVE_APP_KEY).unwrap_or_default()
    }

    pub fn set_last_active_app(&self, bundle_id: &str) -> Result<(), StoreError> {
        self.store.set(LAST_ACTIVE_APP_KEY, bundle_id.to_string())
    }

    pub fn sort_mode(&self) -> SortMode {
        self.get_parsed(SORT_MODE_KEY)
    }

    pub fn set_sort_mode(&self, mode: SortMode) -> Result<(), StoreError> {
        self.store.set(SORT_MODE_KEY, mode.name().to_string())
    }

    /// User categories, or the sample set when none were ever saved.
    pub fn categories(&self) -> Vec<String> {
        self.store
            .get(CATEGORIES_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).warn_on_err())
            .unwrap_or_else(default_categories)
    }

    pub fn set_categories(&self, categories: &[String]) -> Result<(), StoreError> {
        self.put_json(CATEGORIES_KEY, categories)
    }
}

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Assign `0..N-1` when every record still has display order 0.
///
/// Returns whether anything changed. A single record already satisfies the
/// ordering, so only lists of two or more are rewritten.
pub fn normalize_display_order(prompts: &mut [Prompt]) -> bool {
    if prompts.len() < 2 || prompts.iter().any(|p| p.display_order != 0) {
        return false;
    }
    for (index, prompt) in prompts.iter_mut().enumerate() {
        prompt.display_order = index as i64;
    }
    true
}

/// Pretty-printed JSON array of `prompts`.
pub fn export_prompts(prompts: &[Prompt]) -> Result<Vec<u8>, TransferError> {
    if prompts.is_empty() {
        return Err(TransferError::NothingToExport);
    }
    let bytes = serde_json::to_vec_pretty(prompts).map_err(TransferError::Encode)?;
    info!(count = prompts.len(), bytes = bytes.len(), "Exported prompts");
    Ok(bytes)
}

/// Decode an export produced by [`export_prompts`].
pub fn decode_import(bytes: &[u8]) -> Result<Vec<Prompt>, TransferError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(TransferError::EmptyInput);
    }
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(TransferError::MalformedInput)?;
    serde_json::from_value(value).map_err(TransferError::SchemaMismatch)
}

/// Append imported prompts whose id is not already present.
///
/// Existing records are never overwritten. Added records go to the end of
/// the manual order, and drop a quick slot that is already taken.
/// Returns the records that were added, as stored.
pub fn merge_import(existing: &mut Vec<Prompt>, imported: Vec<Prompt>) -> Vec<Prompt> {
    let mut ids: HashSet<_> = existing.iter().map(|p| p.id).collect();
    let mut taken_slots: HashSet<u8> = existing
        .iter()
        .filter(|p| !p.is_archived)
        .filter_map(|p| p.quick_slot)
        .collect();
    let mut next_order = existing
        .iter()
        .map(|p| p.display_order)
        .max()
        .map_or(0, |max| max + 1);

    let mut added = Vec::new();
    for mut prompt in imported {
        if !ids.insert(prompt.id) {
            debug!(prompt_id = %prompt.id, "Skipping imported prompt with existing id");
            continue;
        }
        if let Some(slot) = prompt.quick_slot {
            if prompt.is_archived || !taken_slots.insert(slot) {
                prompt.quick_slot = None;
            }
        }
        prompt.display_order = next_order;
        next_order += 1;
        added.push(prompt.clone());
        existing.push(prompt);
    }

    info!(added = added.len(), total = existing.len(), "Merged imported prompts");
    added
}
