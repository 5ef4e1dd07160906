//! Full backups: prompts, categories and palette preferences in one file.
//!
//! Restoring is best effort per section. A section that is missing or does
//! not decode is skipped and reported; only a file that is not a JSON object
//! at all fails the restore.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::error::TransferError;
use crate::prompts::{PlacementMode, Prompt, SortMode};

use super::persistence::PromptPersistence;
use super::preferences::PreferenceStore;

/// Current backup layout version.
pub const BACKUP_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupPreferences {
    placement_mode: PlacementMode,
    last_active_app: String,
    sort_mode: SortMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupRef<'a> {
    version: u32,
    created_at: DateTime<Utc>,
    prompts: &'a [Prompt],
    categories: &'a [String],
    preferences: BackupPreferences,
}

/// What a restore applied and what it skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Number of prompts restored, if the section was usable
    pub prompts: Option<usize>,
    /// Number of categories restored, if the section was usable
    pub categories: Option<usize>,
    /// Preference keys that were restored
    pub preferences: Vec<&'static str>,
    /// Human-readable notes on skipped sections or fields
    pub skipped: Vec<String>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, what: &str, reason: impl std::fmt::Display) {
        warn!(section = what, reason = %reason, "Skipping backup section");
        self.skipped.push(format!("{}: {}", what, reason));
    }
}

impl<S: PreferenceStore> PromptPersistence<S> {
    /// Serialize the stored prompts, categories and preferences.
    #[instrument(name = "backup_create", skip(self))]
    pub fn create_backup(&self) -> Result<Vec<u8>, TransferError> {
        let prompts = self.load();
        let categories = self.categories();
        let backup = BackupRef {
            version: BACKUP_VERSION,
            created_at: Utc::now(),
            prompts: &prompts,
            categories: &categories,
            preferences: BackupPreferences {
                placement_mode: self.placement_mode(),
                last_active_app: self.last_active_app(),
                sort_mode: self.sort_mode(),
            },
        };
        let bytes = serde_json::to_vec_pretty(&backup).map_err(TransferError::Encode)?;
        info!(
            prompts = prompts.len(),
            categories = categories.len(),
            bytes = bytes.len(),
            "Created backup"
        );
        Ok(bytes)
    }

    /// Restore a backup produced by [`Self::create_backup`].
    ///
    /// Restored sections replace what is stored.
    #[instrument(name = "backup_restore", skip_all, fields(bytes = bytes.len()))]
    pub fn restore_backup(&self, bytes: &[u8]) -> Result<RestoreReport, TransferError> {
        let container: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(TransferError::MalformedBackup)?;
        let mut report = RestoreReport::default();

        match decode_section::<Vec<Prompt>>(&container, "prompts") {
            Ok(prompts) => {
                self.save(&prompts)?;
                report.prompts = Some(prompts.len());
            }
            Err(reason) => report.skip("prompts", reason),
        }

        match decode_section::<Vec<String>>(&container, "categories") {
            Ok(categories) => {
                self.set_categories(&categories)?;
                report.categories = Some(categories.len());
            }
            Err(reason) => report.skip("categories", reason),
        }

        match container.get("preferences") {
            Some(Value::Object(prefs)) => self.restore_preferences(prefs, &mut report)?,
            Some(_) => report.skip("preferences", "not an object"),
            None => report.skip("preferences", "missing"),
        }

        info!(
            prompts = ?report.prompts,
            categories = ?report.categories,
            preferences = report.preferences.len(),
            skipped = report.skipped.len(),
            "Restored backup"
        );
        Ok(report)
    }

    fn restore_preferences(
        &self,
        prefs: &Map<String, Value>,
        report: &mut RestoreReport,
    ) -> Result<(), TransferError> {
        match decode_section::<PlacementMode>(prefs, "placementMode") {
            Ok(mode) => {
                self.set_placement_mode(mode)?;
                report.preferences.push("placementMode");
            }
            Err(reason) => report.skip("preferences.placementMode", reason),
        }
        match decode_section::<String>(prefs, "lastActiveApp") {
            Ok(app) => {
                self.set_last_active_app(&app)?;
                report.preferences.push("lastActiveApp");
            }
            Err(reason) => report.skip("preferences.lastActiveApp", reason),
        }
        match decode_section::<SortMode>(prefs, "sortMode") {
            Ok(mode) => {
                self.set_sort_mode(mode)?;
                report.preferences.push("sortMode");
            }
            Err(reason) => report.skip("preferences.sortMode", reason),
        }
        Ok(())
    }
}

fn decode_section<T: serde::de::DeserializeOwned>(
    container: &Map<String, Value>,
    key: &str,
) -> Result<T, String> {
    let value = container.get(key).ok_or_else(|| "missing".to_string())?;
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferences;
    use std::sync::Arc;

    fn persistence() -> PromptPersistence<MemoryPreferences> {
        PromptPersistence::new(Arc::new(MemoryPreferences::new()))
    }

    #[test]
    fn backup_roundtrips_into_fresh_store() {
        let source = persistence();
        let mut a = Prompt::new("A", "a");
        a.display_order = 1;
        let mut b = Prompt::new("B", "b");
        b.display_order = 2;
        source.save(&[a.clone(), b.clone()]).unwrap();
        source.set_categories(&["Code".to_string()]).unwrap();
        source.set_sort_mode(SortMode::Manual).unwrap();
        source.set_placement_mode(PlacementMode::Clipboard).unwrap();
        source.set_last_active_app("com.example.editor").unwrap();

        let bytes = source.create_backup().unwrap();

        let target = persistence();
        let report = target.restore_backup(&bytes).unwrap();
        assert!(report.is_complete(), "{:?}", report.skipped);
        assert_eq!(report.prompts, Some(2));
        assert_eq!(target.load(), vec![a, b]);
        assert_eq!(target.categories(), vec!["Code"]);
        assert_eq!(target.sort_mode(), SortMode::Manual);
        assert_eq!(target.placement_mode(), PlacementMode::Clipboard);
        assert_eq!(target.last_active_app(), "com.example.editor");
    }

    #[test]
    fn malformed_section_is_skipped() {
        let target = persistence();
        let bytes = br#"{
            "version": 1,
            "prompts": "definitely not prompts",
            "categories": ["Ideas", "Work"],
            "preferences": {"sortMode": "manual", "placementMode": 42}
        }"#;

        let report = target.restore_backup(bytes).unwrap();
        assert_eq!(report.prompts, None);
        assert_eq!(report.categories, Some(2));
        assert_eq!(report.preferences, vec!["sortMode"]);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(target.categories(), vec!["Ideas", "Work"]);
        assert_eq!(target.sort_mode(), SortMode::Manual);
        assert_eq!(target.placement_mode(), PlacementMode::Cursor);
    }

    #[test]
    fn unparsable_container_fails() {
        let target = persistence();
        assert!(matches!(
            target.restore_backup(b"[1, 2, 3]"),
            Err(TransferError::MalformedBackup(_))
        ));
        assert!(matches!(
            target.restore_backup(b"not json"),
            Err(TransferError::MalformedBackup(_))
        ));
    }
}
