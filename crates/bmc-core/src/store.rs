//! Key-value persistence port
//!
//! Session state is a flat string-to-string map, like browser local storage.
//! Structured values are stored JSON-encoded through [`KeyValueStoreExt`].
//!
//! Two implementations:
//! - [`MemoryStore`]: process-local, for tests and embedding
//! - [`FileStore`]: one JSON object on disk, rewritten atomically on change

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;

/// Well-known store keys
pub mod keys {
    /// Logged-in user id
    pub const USER_ID: &str = "userId";
    /// Active idea id
    pub const IDEA_ID: &str = "IdeaId";
    /// JSON-encoded draft
    pub const DRAFT: &str = "bmc";
    /// JSON-encoded version list
    pub const VERSIONS: &str = "bmcVersions";

    /// Every key owned by a login session
    pub const SESSION: [&str; 4] = [USER_ID, IDEA_ID, DRAFT, VERSIONS];
}

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing an absent key is not an error
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON helpers over any [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Decode the JSON value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encoding`] if the stored text is not valid JSON for `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Store `value` JSON-encoded under `key`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or writing fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.set(key, &text)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no key is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file
///
/// The file is read once on open. Every change rewrites it through a
/// sibling temp file and a rename, so readers never see a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp, text).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(keys::USER_ID).unwrap(), None);

        store.set(keys::USER_ID, "u1").unwrap();
        assert_eq!(store.get(keys::USER_ID).unwrap().as_deref(), Some("u1"));

        store.remove(keys::USER_ID).unwrap();
        store.remove(keys::USER_ID).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn json_helpers_encode_values() {
        let store = MemoryStore::new();
        store.set_json(keys::VERSIONS, &vec!["a", "b"]).unwrap();
        assert_eq!(store.get(keys::VERSIONS).unwrap().as_deref(), Some(r#"["a","b"]"#));

        let back: Option<Vec<String>> = store.get_json(keys::VERSIONS).unwrap();
        assert_eq!(back, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn corrupt_json_is_encoding_error() {
        let store = MemoryStore::new();
        store.set(keys::DRAFT, "{not json").unwrap();
        let result: Result<Option<Vec<String>>, _> = store.get_json(keys::DRAFT);
        assert!(matches!(result, Err(StoreError::Encoding(_))));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStore::open(&path).unwrap();
        store.set(keys::USER_ID, "u1").unwrap();
        store.set(keys::IDEA_ID, "i1").unwrap();
        store.remove(keys::IDEA_ID).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(keys::USER_ID).unwrap().as_deref(), Some("u1"));
        assert_eq!(reopened.get(keys::IDEA_ID).unwrap(), None);
        assert!(!path.with_file_name("state.json.tmp").exists());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Encoding(_))));
    }

    #[test]
    fn missing_or_blank_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert_eq!(FileStore::open(&path).unwrap().get(keys::USER_ID).unwrap(), None);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileStore::open(&path).unwrap().get(keys::USER_ID).unwrap(), None);
    }
}
