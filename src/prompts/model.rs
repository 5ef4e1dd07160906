//! Prompt record and the small enums that travel with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a prompt, assigned at creation and never changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(Uuid);

impl PromptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where inserted content lands relative to the focused field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Insert at the cursor
    #[default]
    Cursor,
    /// Replace the field's current contents
    Replace,
    /// Add after the existing content
    Append,
    /// Only copy to the clipboard
    Clipboard,
}

impl PlacementMode {
    pub const ALL: [PlacementMode; 4] = [
        PlacementMode::Cursor,
        PlacementMode::Replace,
        PlacementMode::Append,
        PlacementMode::Clipboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Replace => "replace",
            Self::Append => "append",
            Self::Clipboard => "clipboard",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlacementMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Ordering applied to the unfiltered palette list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Frecency score, highest first
    #[default]
    Smart,
    /// Display order, lowest first
    Manual,
}

impl SortMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" => Ok(Self::Smart),
            "manual" => Ok(Self::Manual),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// A stored enum name that matched no variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown name '{0}'")]
pub struct UnknownName(pub String);

/// Lowest and highest quick slot numbers.
pub const QUICK_SLOT_RANGE: std::ops::RangeInclusive<u8> = 1..=9;

/// A reusable text prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: PromptId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_slot: Option<u8>,
    #[serde(default)]
    pub placement_mode: PlacementMode,
    #[serde(default)]
    pub frecency_score: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PromptId::new(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            category: None,
            is_favorite: false,
            is_archived: false,
            usage_count: 0,
            last_used: None,
            display_order: 0,
            quick_slot: None,
            placement_mode: PlacementMode::default(),
            frecency_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_tags(tags);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the tag set, trimming blanks and dropping case-insensitive duplicates.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into().trim().to_string();
            if tag.is_empty() || out.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
                continue;
            }
            out.push(tag);
        }
        self.tags = out;
    }

    /// Copy with a fresh identity and cleared usage statistics.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: PromptId::new(),
            title: format!("{} (copy)", self.title),
            is_favorite: false,
            is_archived: false,
            usage_count: 0,
            last_used: None,
            quick_slot: None,
            frecency_score: 0.0,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.as_deref().map_or(true, |c| c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_tags_dedupes_case_insensitively() {
        let prompt = Prompt::new("t", "c").with_tags(["Work", " work ", "", "ops"]);
        assert_eq!(prompt.tags, vec!["Work".to_string(), "ops".to_string()]);
    }

    #[test]
    fn duplicate_gets_new_identity_and_resets_usage() {
        let mut original = Prompt::new("Greeting", "Hello {{name}}");
        original.usage_count = 4;
        original.quick_slot = Some(2);
        original.frecency_score = 3.5;

        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.title, "Greeting (copy)");
        assert_eq!(copy.content, original.content);
        assert_eq!(copy.usage_count, 0);
        assert_eq!(copy.quick_slot, None);
        assert_eq!(copy.frecency_score, 0.0);
    }

    #[test]
    fn serializes_with_camel_case_and_iso_dates() {
        let mut prompt = Prompt::new("t", "c");
        prompt.last_used = Some(Utc::now());
        let json = serde_json::to_string(&prompt).unwrap();
        assert!(json.contains("\"displayOrder\""));
        assert!(json.contains("\"placementMode\":\"cursor\""));
        assert!(json.contains("\"lastUsed\":\""));
    }

    #[test]
    fn decodes_records_with_only_required_fields() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","title":"A","content":"B"}"#;
        let prompt: Prompt = serde_json::from_str(json).unwrap();
        assert_eq!(prompt.title, "A");
        assert!(prompt.tags.is_empty());
        assert_eq!(prompt.placement_mode, PlacementMode::Cursor);
        assert!(prompt.is_uncategorized());
    }

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!("Manual".parse::<SortMode>(), Ok(SortMode::Manual));
        assert_eq!("APPEND".parse::<PlacementMode>(), Ok(PlacementMode::Append));
        assert!("sideways".parse::<PlacementMode>().is_err());
    }
}
