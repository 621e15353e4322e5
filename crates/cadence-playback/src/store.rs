//! Persistence for the mute flag.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Key-value storage for boolean preferences.
pub trait MuteStore {
    /// Reads a flag; `None` if it was never saved.
    fn load(&self, key: &str) -> StoreResult<Option<bool>>;

    /// Writes a flag.
    fn save(&mut self, key: &str, value: bool) -> StoreResult<()>;
}

/// Process-lifetime store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MuteStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<bool>> {
        Ok(self.values.get(key).copied())
    }

    fn save(&mut self, key: &str, value: bool) -> StoreResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// Other keys in the file are preserved on save. A missing file reads as
/// empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Map<String, Value>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(serde_json::from_str(&json)?)
    }
}

impl MuteStore for JsonFileStore {
    fn load(&self, key: &str) -> StoreResult<Option<bool>> {
        Ok(self.read()?.get(key).and_then(Value::as_bool))
    }

    fn save(&mut self, key: &str, value: bool) -> StoreResult<()> {
        let mut values = self.read()?;
        values.insert(key.to_string(), Value::Bool(value));
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("muted").unwrap(), None);
        store.save("muted", true).unwrap();
        assert_eq!(store.load("muted").unwrap(), Some(true));
    }

    #[test]
    fn test_json_store_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{ "theme": "dark" }"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load("cadence.audio.muted").unwrap(), None);
        store.save("cadence.audio.muted", true).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load("cadence.audio.muted").unwrap(), Some(true));
        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load("muted").unwrap(), None);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load("muted"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_json_store_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("missing").join("prefs.json"));
        assert!(matches!(store.save("muted", true), Err(StoreError::Io { .. })));
    }
}
