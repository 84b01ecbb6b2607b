//! Token Storage Backends
//!
//! Key-value capability the session reads and writes the auth token
//! through. The file backend is durable across process restarts for the same
//! OS user; the memory backend lives as long as the process.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Read/write/clear capability over durable client-side storage
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors from a token storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Corrupt session file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Failed to encode session data: {0}")]
    Encode(String),
}

/// In-process storage, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token under `key`
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Durable storage: a small TOML table of string entries on disk
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        toml::from_str(&content).map_err(|e| StorageError::Parse {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content =
            toml::to_string(entries).map_err(|e| StorageError::Encode(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, e: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.read("authToken").unwrap(), None);

        store.write("authToken", "abc123").unwrap();
        assert_eq!(store.read("authToken").unwrap().as_deref(), Some("abc123"));

        store.clear("authToken").unwrap();
        assert_eq!(store.read("authToken").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        FileTokenStore::new(&path).write("authToken", "abc123").unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.read("authToken").unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_file_store_clear_keeps_other_entries() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.toml"));

        store.write("authToken", "abc123").unwrap();
        store.write("other", "value").unwrap();
        store.clear("authToken").unwrap();

        assert_eq!(store.read("authToken").unwrap(), None);
        assert_eq!(store.read("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_file_store_clear_missing_file() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.toml"));

        store.clear("authToken").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = FileTokenStore::new(&path).read("authToken").unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }
}
