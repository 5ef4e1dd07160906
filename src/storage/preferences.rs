//! Key/value preference stores.
//!
//! Persistence code receives a store explicitly instead of reaching for a
//! process-wide one. [`MemoryPreferences`] backs tests; [`JsonFilePreferences`]
//! keeps everything in one JSON object on disk.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// A string-keyed store of string values.
///
/// Implementations use interior mutability so one store can be shared
/// behind an `Arc` by several adapters.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object, rewritten atomically on each change.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferences {
    /// Open the store at `path`.
    ///
    /// A missing or unreadable file starts an empty store; it is created on
    /// the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(values) => {
                    info!(path = %path.display(), keys = values.len(), "Loaded preferences");
                    values
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Preferences file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Preferences file not found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read preferences, starting empty");
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write temp file then rename, so a crash never leaves a half-written file.
    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(values).map_err(|source| StoreError::Serialize {
            key: "*".to_string(),
            source,
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &json).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), bytes = json.len(), "Saved preferences (atomic)");
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    // Memory only changes after the file write succeeds.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut values = self.values.lock();
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        self.flush(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock();
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.flush(&next)?;
        *values = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryPreferences::new();
        assert!(store.get("k").is_none());
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = JsonFilePreferences::open(&path);
        store.set("sortMode", "manual".to_string()).unwrap();
        drop(store);

        let reopened = JsonFilePreferences::open(&path);
        assert_eq!(reopened.get("sortMode").as_deref(), Some("manual"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_values_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = JsonFilePreferences::open(&path);
        store.set("sortMode", "smart".to_string()).unwrap();

        // A regular file where the parent directory should be makes every flush fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let broken = JsonFilePreferences::open(blocker.join("preferences.json"));
        assert!(broken.set("sortMode", "manual".to_string()).is_err());
        assert!(broken.get("sortMode").is_none());

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(store.set("sortMode", "manual".to_string()).is_err());
        assert_eq!(store.get("sortMode").as_deref(), Some("smart"));
        assert!(store.remove("sortMode").is_err());
        assert_eq!(store.get("sortMode").as_deref(), Some("smart"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFilePreferences::open(&path);
        assert!(store.get("anything").is_none());
        store.set("a", "b".to_string()).unwrap();
        assert_eq!(JsonFilePreferences::open(&path).get("a").as_deref(), Some("b"));
    }
}
