//! Durable key-value storage for the last-background timestamp.
//!
//! The on-disk format is a flat JSON object of integer values:
//!
//! ```json
//! { "last_background_ms": 1700000000000 }
//! ```
//!
//! Missing, empty or unparseable files load as an empty store. Writes go to a
//! sibling temp file which is then renamed over the original.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use tracing::warn;

/// Key under which the last-background timestamp is stored.
pub const LAST_BACKGROUND_KEY: &str = "last_background_ms";

/// Errors that can occur while persisting values.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Integer key-value store.
pub trait TimestampStore {
    /// Read a value, `None` if the key was never written.
    fn get(&self, key: &str) -> Option<i64>;

    /// Write a value, replacing any previous one.
    ///
    /// On `Err` the store is left unchanged: `get` keeps returning the value
    /// from before the call.
    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

/// Volatile store, lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimestampStore for MemoryStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, i64>,
}

impl FileStore {
    /// Open the store at `path`, loading existing values if the file is readable.
    pub fn open(path: &Path) -> Self {
        let values = load_values(path);
        debug!("Opened store {} ({} keys)", path.display(), values.len());
        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let written = std::fs::write(&tmp, content)
            .and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }
}

impl TimestampStore for FileStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

fn load_values(path: &Path) -> HashMap<String, i64> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!("Failed to read store {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    if content.trim().is_empty() {
        return HashMap::new();
    }

    match serde_json::from_str(&content) {
        Ok(values) => values,
        Err(e) => {
            warn!(
                "Failed to parse store {}: {}, starting empty",
                path.display(),
                e
            );
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_absent_then_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(LAST_BACKGROUND_KEY), None);

        store.set(LAST_BACKGROUND_KEY, 0).unwrap();
        assert_eq!(store.get(LAST_BACKGROUND_KEY), Some(0));

        store.set(LAST_BACKGROUND_KEY, 42).unwrap();
        assert_eq!(store.get(LAST_BACKGROUND_KEY), Some(42));
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(&dir.path().join("state.json"));
        assert_eq!(store.get(LAST_BACKGROUND_KEY), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = FileStore::open(&path);
        store.set(LAST_BACKGROUND_KEY, 1_700_000_000_000).unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(LAST_BACKGROUND_KEY), Some(1_700_000_000_000));
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path);
        store.set(LAST_BACKGROUND_KEY, 1).unwrap();
        store.set(LAST_BACKGROUND_KEY, 2).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(LAST_BACKGROUND_KEY), Some(2));
    }

    #[test]
    fn test_file_store_corrupt_and_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(FileStore::open(&path).get(LAST_BACKGROUND_KEY), None);

        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileStore::open(&path).get(LAST_BACKGROUND_KEY), None);

        // A corrupt file is replaced on the next write
        std::fs::write(&path, "garbage").unwrap();
        let mut store = FileStore::open(&path);
        store.set(LAST_BACKGROUND_KEY, 7).unwrap();
        assert_eq!(FileStore::open(&path).get(LAST_BACKGROUND_KEY), Some(7));
    }

    #[test]
    fn test_file_store_failed_write_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let path = blocker.join("state.json");

        let mut store = FileStore::open(&path);
        assert!(store.set(LAST_BACKGROUND_KEY, 5).is_err());
        assert_eq!(store.get(LAST_BACKGROUND_KEY), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_failed_rename_restores_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path);
        store.set(LAST_BACKGROUND_KEY, 1).unwrap();

        // A directory in place of the file makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        assert!(store.set(LAST_BACKGROUND_KEY, 2).is_err());
        assert_eq!(store.get(LAST_BACKGROUND_KEY), Some(1));
        assert!(!dir.path().join("state.json.tmp").exists());
    }
}
