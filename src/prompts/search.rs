//! Palette search: filtering, ordering and derived lists over a prompt collection.
//!
//! Query mini-language, checked in this order:
//! - `#fragment` matches prompts with a tag containing `fragment`
//! - `mode:name` matches prompts whose placement mode name contains `name`
//! - `category:name` matches prompts whose category contains `name`;
//!   `category:none` and `category:uncategorized` match prompts without one
//! - anything else matches title, content or any tag
//!
//! All matching is case-insensitive. Archived prompts never appear.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::{DEFAULT_RECENT_LIMIT, DEFAULT_SEARCH_RESULT_LIMIT, DEFAULT_SUGGESTION_LIMIT};

use super::model::{Prompt, SortMode, QUICK_SLOT_RANGE};

const TAG_PREFIX: &str = "#";
const MODE_PREFIX: &str = "mode:";
const CATEGORY_PREFIX: &str = "category:";

/// A classified palette query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchQuery {
    /// Empty query: the unfiltered list in the caller's sort mode
    All,
    Tag(String),
    Mode(String),
    Category(CategoryFilter),
    Text(String),
}

/// Target of a `category:` query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    Uncategorized,
    Named(String),
}

impl SearchQuery {
    /// Classify raw query text. Fragments are stored lowercased.
    pub fn parse(raw: &str) -> Self {
        let query = raw.trim();
        if query.is_empty() {
            return Self::All;
        }

        if let Some(rest) = query.strip_prefix(TAG_PREFIX) {
            return Self::Tag(rest.trim().to_lowercase());
        }
        if let Some(rest) = query.strip_prefix(MODE_PREFIX) {
            return Self::Mode(rest.trim().to_lowercase());
        }
        if let Some(rest) = query.strip_prefix(CATEGORY_PREFIX) {
            let value = rest.trim().to_lowercase();
            return match value.as_str() {
                "none" | "uncategorized" => Self::Category(CategoryFilter::Uncategorized),
                _ => Self::Category(CategoryFilter::Named(value)),
            };
        }
        Self::Text(query.to_lowercase())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a non-archived prompt satisfies this query.
    pub fn matches(&self, prompt: &Prompt) -> bool {
        match self {
            Self::All => true,
            Self::Tag(fragment) => any_tag_contains(prompt, fragment),
            Self::Mode(fragment) => contains_ignore_case(prompt.placement_mode.name(), fragment),
            Self::Category(CategoryFilter::Uncategorized) => prompt.is_uncategorized(),
            Self::Category(CategoryFilter::Named(fragment)) => prompt
                .category
                .as_deref()
                .is_some_and(|c| contains_ignore_case(c, fragment)),
            Self::Text(text) => {
                contains_ignore_case(&prompt.title, text)
                    || contains_ignore_case(&prompt.content, text)
                    || any_tag_contains(prompt, text)
            }
        }
    }
}

/// Case-insensitive substring check. `needle_lower` must already be lowercase.
#[inline]
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle_lower.is_ascii() {
        let h = haystack.as_bytes();
        let n = needle_lower.as_bytes();
        if n.len() > h.len() {
            return false;
        }
        return h
            .windows(n.len())
            .any(|w| w.iter().zip(n).all(|(a, b)| a.to_ascii_lowercase() == *b));
    }
    haystack.to_lowercase().contains(needle_lower)
}

fn any_tag_contains(prompt: &Prompt, fragment_lower: &str) -> bool {
    prompt
        .tags
        .iter()
        .any(|tag| contains_ignore_case(tag, fragment_lower))
}

fn by_frecency_desc(a: &&Prompt, b: &&Prompt) -> Ordering {
    b.frecency_score
        .partial_cmp(&a.frecency_score)
        .unwrap_or(Ordering::Equal)
}

fn by_display_order(a: &&Prompt, b: &&Prompt) -> Ordering {
    a.display_order.cmp(&b.display_order)
}

fn active(prompts: &[Prompt]) -> impl Iterator<Item = &Prompt> {
    prompts.iter().filter(|p| !p.is_archived)
}

/// Ordered visible subset of `prompts` for a palette query.
///
/// An empty query uses `sort`; any other query is ordered by frecency,
/// since manual order only makes sense for the unfiltered list.
/// Sorting is stable, so ties keep collection order.
pub fn filter<'a>(prompts: &'a [Prompt], query: &str, sort: SortMode) -> Vec<&'a Prompt> {
    let query = SearchQuery::parse(query);
    let mut results: Vec<&Prompt> = active(prompts).filter(|p| query.matches(p)).collect();

    match (query.is_all(), sort) {
        (true, SortMode::Manual) => results.sort_by(by_display_order),
        _ => results.sort_by(by_frecency_desc),
    }
    results
}

/// [`filter`] truncated to `limit` results.
pub fn filter_bounded<'a>(
    prompts: &'a [Prompt],
    query: &str,
    sort: SortMode,
    limit: usize,
) -> Vec<&'a Prompt> {
    let mut results = filter(prompts, query, sort);
    results.truncate(limit);
    results
}

/// [`filter_bounded`] with the default cap of 50.
pub fn filter_default_bounded<'a>(
    prompts: &'a [Prompt],
    query: &str,
    sort: SortMode,
) -> Vec<&'a Prompt> {
    filter_bounded(prompts, query, sort, DEFAULT_SEARCH_RESULT_LIMIT)
}

/// Favorite prompts, alphabetical by title.
pub fn favorites(prompts: &[Prompt]) -> Vec<&Prompt> {
    let mut results: Vec<&Prompt> = active(prompts).filter(|p| p.is_favorite).collect();
    results.sort_by_cached_key(|p| p.title.to_lowercase());
    results
}

/// The five most recently used prompts.
pub fn recent(prompts: &[Prompt]) -> Vec<&Prompt> {
    recent_with_limit(prompts, DEFAULT_RECENT_LIMIT)
}

pub fn recent_with_limit(prompts: &[Prompt], limit: usize) -> Vec<&Prompt> {
    let mut results: Vec<&Prompt> = active(prompts).filter(|p| p.last_used.is_some()).collect();
    results.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    results.truncate(limit);
    results
}

/// Map of quick slot number to the prompt claiming it.
///
/// When two prompts claim the same slot the later one in collection order
/// wins. `PromptLibrary::assign_quick_slot` keeps slots unique, so this only
/// matters for hand-edited or imported data.
pub fn quick_slot_map(prompts: &[Prompt]) -> BTreeMap<u8, &Prompt> {
    let mut map = BTreeMap::new();
    for prompt in active(prompts) {
        if let Some(slot) = prompt.quick_slot.filter(|s| QUICK_SLOT_RANGE.contains(s)) {
            map.insert(slot, prompt);
        }
    }
    map
}

/// Prompt bound to `slot`, if any.
pub fn prompt_for_slot(prompts: &[Prompt], slot: u8) -> Option<&Prompt> {
    quick_slot_map(prompts).remove(&slot)
}

/// Prompts in `category` (or without one for `None`), by display order.
pub fn prompts_in_category<'a>(prompts: &'a [Prompt], category: Option<&str>) -> Vec<&'a Prompt> {
    let mut results: Vec<&Prompt> = active(prompts)
        .filter(|p| match category {
            Some(name) => p.category.as_deref() == Some(name),
            None => p.is_uncategorized(),
        })
        .collect();
    results.sort_by(by_display_order);
    results
}

/// Up to five completions for a partially typed query.
pub fn suggestions(prompts: &[Prompt], partial: &str) -> Vec<String> {
    suggestions_with_limit(prompts, partial, DEFAULT_SUGGESTION_LIMIT)
}

/// Completions for a partially typed query, sorted and deduplicated.
///
/// `#` completes tag names and `category:` completes category names, both
/// skipping a value equal to what was typed. Plain text completes titles.
/// The returned strings are bare values without the prefix.
pub fn suggestions_with_limit(prompts: &[Prompt], partial: &str, limit: usize) -> Vec<String> {
    let partial = partial.trim();
    if partial.is_empty() {
        return Vec::new();
    }

    let mut found: BTreeSet<String> = BTreeSet::new();

    if let Some(rest) = partial.strip_prefix(TAG_PREFIX) {
        let fragment = rest.trim().to_lowercase();
        for tag in active(prompts).flat_map(|p| p.tags.iter()) {
            if contains_ignore_case(tag, &fragment) && tag.to_lowercase() != fragment {
                found.insert(tag.clone());
            }
        }
    } else if let Some(rest) = partial.strip_prefix(CATEGORY_PREFIX) {
        let fragment = rest.trim().to_lowercase();
        for category in active(prompts).filter_map(|p| p.category.as_ref()) {
            if contains_ignore_case(category, &fragment) && category.to_lowercase() != fragment {
                found.insert(category.clone());
            }
        }
    } else {
        let fragment = partial.to_lowercase();
        for prompt in active(prompts) {
            if contains_ignore_case(&prompt.title, &fragment) {
                found.insert(prompt.title.clone());
            }
        }
    }

    found.into_iter().take(limit).collect()
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
