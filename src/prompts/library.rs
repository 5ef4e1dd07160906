//! In-process owner of the prompt collection.
//!
//! Every mutation is written through to the preference store before the
//! call returns. A failed write leaves the in-memory collection as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{LibraryError, ResultExt, TransferError};
use crate::frecency::Frecency;
use crate::storage::{
    decode_import, export_prompts, merge_import, PreferenceStore, PromptPersistence, RestoreReport,
};

use super::model::{PlacementMode, Prompt, PromptId, SortMode, QUICK_SLOT_RANGE};
use super::search;

/// Fields for a prompt created by the user.
#[derive(Clone, Debug, Default)]
pub struct NewPrompt {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub placement_mode: PlacementMode,
    pub is_favorite: bool,
}

/// Partial edit; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct PromptEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the category
    pub category: Option<Option<String>>,
    pub placement_mode: Option<PlacementMode>,
}

pub struct PromptLibrary<S: PreferenceStore> {
    prompts: Vec<Prompt>,
    categories: Vec<String>,
    persistence: PromptPersistence<S>,
    frecency: Frecency,
    result_limit: usize,
    recent_limit: usize,
    suggestion_limit: usize,
}

impl<S: PreferenceStore> PromptLibrary<S> {
    /// Load the collection and categories from `store`.
    pub fn open(store: Arc<S>, config: &Config) -> Self {
        let persistence = PromptPersistence::new(store);
        let prompts = persistence.load();
        let categories = persistence.categories();
        Self {
            prompts,
            categories,
            persistence,
            frecency: Frecency::new(config.effective_half_life_days()),
            result_limit: config.search_result_limit,
            recent_limit: config.recent_limit,
            suggestion_limit: config.suggestion_limit,
        }
    }

    pub fn persistence(&self) -> &PromptPersistence<S> {
        &self.persistence
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn get(&self, id: PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    fn index_of(&self, id: PromptId) -> Result<usize, LibraryError> {
        self.prompts
            .iter()
            .position(|p| p.id == id)
            .ok_or(LibraryError::UnknownPrompt(id))
    }

    /// Run `change` on a copy of the collection and keep it only once saved.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Vec<Prompt>) -> T,
    ) -> Result<T, LibraryError> {
        let mut next = self.prompts.clone();
        let out = change(&mut next);
        self.persistence.save(&next)?;
        self.prompts = next;
        Ok(out)
    }

    /// Save new categories and prompts together; on failure neither changes in memory.
    fn commit_categories(
        &mut self,
        categories: Vec<String>,
        prompts: Vec<Prompt>,
    ) -> Result<(), LibraryError> {
        self.persistence.set_categories(&categories)?;
        if let Err(e) = self.persistence.save(&prompts) {
            self.persistence.set_categories(&self.categories).log_err();
            return Err(e.into());
        }
        self.categories = categories;
        self.prompts = prompts;
        Ok(())
    }

    fn next_display_order(&self) -> i64 {
        self.prompts
            .iter()
            .map(|p| p.display_order)
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Palette list for `query`, using the stored sort mode and the configured cap.
    pub fn visible(&self, query: &str) -> Vec<&Prompt> {
        search::filter_bounded(&self.prompts, query, self.sort_mode(), self.result_limit)
    }

    /// Most recently used prompts, up to the configured count.
    pub fn recent(&self) -> Vec<&Prompt> {
        search::recent_with_limit(&self.prompts, self.recent_limit)
    }

    /// Completions for a partial `query`, up to the configured count.
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        search::suggestions_with_limit(&self.prompts, query, self.suggestion_limit)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.persistence.sort_mode()
    }

    pub fn set_sort_mode(&self, mode: SortMode) -> Result<(), LibraryError> {
        self.persistence.set_sort_mode(mode)?;
        Ok(())
    }

    /// Prompt bound to quick slot `slot`.
    pub fn prompt_for_slot(&self, slot: u8) -> Option<&Prompt> {
        search::prompt_for_slot(&self.prompts, slot)
    }

    #[instrument(name = "library_add", skip_all)]
    pub fn add(&mut self, new: NewPrompt) -> Result<PromptId, LibraryError> {
        let mut prompt = Prompt::new(new.title, new.content).with_tags(new.tags);
        prompt.category = new.category.filter(|c| !c.trim().is_empty());
        prompt.placement_mode = new.placement_mode;
        prompt.is_favorite = new.is_favorite;
        prompt.display_order = self.next_display_order();

        let id = prompt.id;
        let title = prompt.title.clone();
        self.commit(|prompts| prompts.push(prompt))?;
        info!(prompt_id = %id, title = %title, "Prompt created");
        Ok(id)
    }

    /// Duplicate `id` as a new prompt at the end of the manual order.
    pub fn clone_prompt(&mut self, id: PromptId) -> Result<PromptId, LibraryError> {
        let index = self.index_of(id)?;
        let mut copy = self.prompts[index].duplicate();
        copy.display_order = self.next_display_order();
        let new_id = copy.id;
        self.commit(|prompts| prompts.push(copy))?;
        info!(source_id = %id, prompt_id = %new_id, "Prompt cloned");
        Ok(new_id)
    }

    pub fn update(&mut self, id: PromptId, edit: PromptEdit) -> Result<(), LibraryError> {
        let index = self.index_of(id)?;
        self.commit(|prompts| {
            let prompt = &mut prompts[index];
            if let Some(title) = edit.title {
                prompt.title = title;
            }
            if let Some(content) = edit.content {
                prompt.content = content;
            }
            if let Some(tags) = edit.tags {
                prompt.set_tags(tags);
            }
            if let Some(category) = edit.category {
                prompt.category = category.filter(|c| !c.trim().is_empty());
            }
            if let Some(mode) = edit.placement_mode {
                prompt.placement_mode = mode;
            }
            prompt.updated_at = Utc::now();
        })
    }

    /// Record an insertion of `id` now.
    pub fn record_usage(&mut self, id: PromptId) -> Result<(), LibraryError> {
        self.record_usage_at(id, Utc::now())
    }

    pub fn record_usage_at(&mut self, id: PromptId, now: DateTime<Utc>) -> Result<(), LibraryError> {
        let index = self.index_of(id)?;
        let frecency = self.frecency;
        self.commit(|prompts| frecency.record_use(&mut prompts[index], now))
    }

    /// Flip the favorite flag, returning the new value.
    pub fn toggle_favorite(&mut self, id: PromptId) -> Result<bool, LibraryError> {
        let index = self.index_of(id)?;
        self.commit(|prompts| {
            let prompt = &mut prompts[index];
            prompt.is_favorite = !prompt.is_favorite;
            prompt.is_favorite
        })
    }

    /// Soft delete. The prompt gives up its quick slot.
    pub fn archive(&mut self, id: PromptId) -> Result<(), LibraryError> {
        let index = self.index_of(id)?;
        self.commit(|prompts| {
            let prompt = &mut prompts[index];
            prompt.is_archived = true;
            prompt.quick_slot = None;
            prompt.updated_at = Utc::now();
        })?;
        info!(prompt_id = %id, "Prompt archived");
        Ok(())
    }

    pub fn unarchive(&mut self, id: PromptId) -> Result<(), LibraryError> {
        let index = self.index_of(id)?;
        self.commit(|prompts| {
            let prompt = &mut prompts[index];
            prompt.is_archived = false;
            prompt.updated_at = Utc::now();
        })
    }

    /// Remove `id` from storage for good.
    pub fn delete(&mut self, id: PromptId) -> Result<Prompt, LibraryError> {
        let index = self.index_of(id)?;
        let removed = self.commit(|prompts| prompts.remove(index))?;
        info!(prompt_id = %id, "Prompt deleted");
        Ok(removed)
    }

    /// Bind `id` to `slot`, or unbind it with `None`.
    ///
    /// Any other prompt holding the slot loses it, so each slot maps to at
    /// most one prompt. Archived prompts cannot take a slot.
    pub fn assign_quick_slot(&mut self, id: PromptId, slot: Option<u8>) -> Result<(), LibraryError> {
        if let Some(slot) = slot {
            if !QUICK_SLOT_RANGE.contains(&slot) {
                return Err(LibraryError::InvalidQuickSlot(slot));
            }
        }
        let index = self.index_of(id)?;
        if slot.is_some() && self.prompts[index].is_archived {
            return Err(LibraryError::ArchivedPrompt(id));
        }

        self.commit(|prompts| {
            if slot.is_some() {
                for (i, other) in prompts.iter_mut().enumerate() {
                    if i != index && other.quick_slot == slot {
                        info!(prompt_id = %other.id, slot = ?slot, "Quick slot reassigned");
                        other.quick_slot = None;
                    }
                }
            }
            prompts[index].quick_slot = slot;
        })
    }

    /// Move `id` to position `to_index` of the manual order.
    ///
    /// Active prompts are renumbered `0..N-1` in their new order; archived
    /// prompts follow. `to_index` past the end moves the prompt last.
    pub fn move_prompt(&mut self, id: PromptId, to_index: usize) -> Result<(), LibraryError> {
        self.index_of(id)?;

        let mut active: Vec<PromptId> = search::filter(&self.prompts, "", SortMode::Manual)
            .into_iter()
            .map(|p| p.id)
            .collect();
        let mut archived: Vec<&Prompt> = self.prompts.iter().filter(|p| p.is_archived).collect();
        archived.sort_by_key(|p| p.display_order);
        let archived: Vec<PromptId> = archived.into_iter().map(|p| p.id).collect();

        if let Some(from) = active.iter().position(|p| *p == id) {
            active.remove(from);
            active.insert(to_index.min(active.len()), id);
        }

        self.commit(|prompts| {
            for (order, pid) in active.iter().chain(archived.iter()).enumerate() {
                if let Some(prompt) = prompts.iter_mut().find(|p| p.id == *pid) {
                    prompt.display_order = order as i64;
                }
            }
        })
    }

    pub fn export_bytes(&self) -> Result<Vec<u8>, LibraryError> {
        Ok(export_prompts(&self.prompts)?)
    }

    /// Merge an export into the collection, returning how many prompts were added.
    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<usize, LibraryError> {
        let imported = decode_import(bytes)?;
        let mut next = self.prompts.clone();
        let added = merge_import(&mut next, imported);
        if !added.is_empty() {
            self.persistence.save(&next)?;
            self.prompts = next;
        }
        Ok(added.len())
    }

    pub fn create_backup(&self) -> Result<Vec<u8>, TransferError> {
        self.persistence.create_backup()
    }

    /// Restore a backup and reload the collection from storage.
    pub fn restore_backup(&mut self, bytes: &[u8]) -> Result<RestoreReport, TransferError> {
        let report = self.persistence.restore_backup(bytes)?;
        self.prompts = self.persistence.load();
        self.categories = self.persistence.categories();
        Ok(report)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn add_category(&mut self, name: &str) -> Result<(), LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::EmptyCategoryName);
        }
        if self.has_category(name) {
            return Err(LibraryError::DuplicateCategory(name.to_string()));
        }
        let mut categories = self.categories.clone();
        categories.push(name.to_string());
        self.persistence.set_categories(&categories)?;
        self.categories = categories;
        Ok(())
    }

    /// Rename a category and move its prompts along with it.
    pub fn rename_category(&mut self, from: &str, to: &str) -> Result<(), LibraryError> {
        let to = to.trim();
        if to.is_empty() {
            return Err(LibraryError::EmptyCategoryName);
        }
        let position = self
            .categories
            .iter()
            .position(|c| c == from)
            .ok_or_else(|| LibraryError::UnknownCategory(from.to_string()))?;
        if !from.eq_ignore_ascii_case(to) && self.has_category(to) {
            return Err(LibraryError::DuplicateCategory(to.to_string()));
        }

        let mut categories = self.categories.clone();
        categories[position] = to.to_string();
        let mut prompts = self.prompts.clone();
        for prompt in prompts.iter_mut() {
            if prompt.category.as_deref() == Some(from) {
                prompt.category = Some(to.to_string());
            }
        }
        self.commit_categories(categories, prompts)
    }

    /// Delete a category; its prompts become uncategorized.
    pub fn remove_category(&mut self, name: &str) -> Result<(), LibraryError> {
        let position = self
            .categories
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LibraryError::UnknownCategory(name.to_string()))?;

        let mut categories = self.categories.clone();
        categories.remove(position);
        let mut prompts = self.prompts.clone();
        for prompt in prompts.iter_mut() {
            if prompt.category.as_deref() == Some(name) {
                prompt.category = None;
            }
        }
        self.commit_categories(categories, prompts)
    }
}
