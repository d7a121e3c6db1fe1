use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key under which the remembered birth date is kept.
pub const STORED_DOB_KEY: &str = "storedDOB";

/// Local key-value slot storage. Each call fully replaces or removes one value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// On-disk shape of `storage.json`: a flat object of string values.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct StoredValues {
    pub values: BTreeMap<String, String>,
}

impl Persistable for StoredValues {
    fn filename() -> &'static str {
        "storage.json"
    }
    fn is_json() -> bool {
        true
    }
}

/// Store backed by `storage.json` in a data directory. The file is read once
/// on open and rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    data: StoredValues,
}

impl JsonFileStore {
    /// A file that cannot be read or parsed counts as empty; the next write
    /// replaces it.
    pub fn open(dir: &Path) -> Self {
        let data = match StoredValues::load_from(dir) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unusable storage file");
                StoredValues::default()
            }
        };
        JsonFileStore {
            dir: dir.to_path_buf(),
            data,
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.data.clone();
        next.values.insert(key.to_string(), value.to_string());
        next.save_to(&self.dir)?;
        self.data = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.data.values.contains_key(key) {
            return Ok(());
        }
        let mut next = self.data.clone();
        next.values.remove(key);
        next.save_to(&self.dir)?;
        self.data = next;
        Ok(())
    }
}

/// Store that lives only as long as the process.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = MemoryStore::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileStore::open(tmp.path());
        assert_eq!(store.get(STORED_DOB_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(tmp.path());
        store.set(STORED_DOB_KEY, "1970-06-20").unwrap();

        let reopened = JsonFileStore::open(tmp.path());
        assert_eq!(
            reopened.get(STORED_DOB_KEY).unwrap().as_deref(),
            Some("1970-06-20")
        );
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(tmp.path());
        store.set(STORED_DOB_KEY, "1970-06-20").unwrap();
        store.set(STORED_DOB_KEY, "1961-01-31").unwrap();
        let reopened = JsonFileStore::open(tmp.path());
        assert_eq!(
            reopened.get(STORED_DOB_KEY).unwrap().as_deref(),
            Some("1961-01-31")
        );
    }

    #[test]
    fn test_remove_deletes_key_on_disk() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(tmp.path());
        store.set(STORED_DOB_KEY, "1970-06-20").unwrap();
        store.remove(STORED_DOB_KEY).unwrap();

        let reopened = JsonFileStore::open(tmp.path());
        assert_eq!(reopened.get(STORED_DOB_KEY).unwrap(), None);
        let raw = fs::read_to_string(tmp.path().join("storage.json")).unwrap();
        assert!(!raw.contains(STORED_DOB_KEY));
    }

    #[test]
    fn test_remove_missing_key_does_not_create_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(tmp.path());
        store.remove(STORED_DOB_KEY).unwrap();
        assert!(!tmp.path().join("storage.json").exists());
    }

    #[test]
    fn test_file_is_flat_json_object() {
        let tmp = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(tmp.path());
        store.set(STORED_DOB_KEY, "1959-12-01").unwrap();
        let raw = fs::read_to_string(tmp.path().join("storage.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[STORED_DOB_KEY], "1959-12-01");
    }

    #[test]
    fn test_unusable_file_opens_empty_and_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        fs::write(&path, r#"{"storedDOB": 19600315}"#).unwrap();

        let mut store = JsonFileStore::open(tmp.path());
        assert_eq!(store.get(STORED_DOB_KEY).unwrap(), None);

        store.set(STORED_DOB_KEY, "1960-03-15").unwrap();
        let reopened = JsonFileStore::open(tmp.path());
        assert_eq!(
            reopened.get(STORED_DOB_KEY).unwrap().as_deref(),
            Some("1960-03-15")
        );
    }

    #[test]
    fn test_garbage_file_opens_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("storage.json"), "not json at all").unwrap();
        let store = JsonFileStore::open(tmp.path());
        assert_eq!(store.get(STORED_DOB_KEY).unwrap(), None);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the data directory should be makes every write fail.
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut store = JsonFileStore {
            dir: blocker,
            data: StoredValues::default(),
        };
        assert!(store.set(STORED_DOB_KEY, "1970-06-20").is_err());
        assert_eq!(store.get(STORED_DOB_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::with(STORED_DOB_KEY, "1960-03-15");
        assert_eq!(store.get(STORED_DOB_KEY).unwrap().as_deref(), Some("1960-03-15"));
        store.set(STORED_DOB_KEY, "1960-03-16").unwrap();
        assert_eq!(store.get(STORED_DOB_KEY).unwrap().as_deref(), Some("1960-03-16"));
        store.remove(STORED_DOB_KEY).unwrap();
        assert_eq!(store.get(STORED_DOB_KEY).unwrap(), None);
    }
}
