//! Key/value stores for client-side state.
//!
//! | Store          | Lifetime        | Used for                    |
//! |----------------|-----------------|-----------------------------|
//! | `FileStore`    | across runs     | theme, sound preference     |
//! | `SessionStore` | one process     | the "has loaded" flag       |
//!
//! Both are last-write-wins; there is no conflict resolution.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("Store file parsing error in `{0}`")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Failed to serialize store")]
    Serialize(#[from] toml::ser::Error),
}

/// String key/value storage.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Persistent store backed by a TOML file, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|err| StorageError::Parse(path.clone(), err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(StorageError::Io(path, err)),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_owned(), value.to_owned());

        let text = toml::to_string(&next)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StorageError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(&self.path, text).map_err(|err| StorageError::Io(self.path.clone(), err))?;

        // Memory only follows a successful write
        *entries = next;
        Ok(())
    }
}

/// In-memory store living as long as the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<FxHashMap<String, String>>,
}

impl Store for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_failed_write_keeps_memory() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = FileStore::open(blocker.join("prefs.toml")).unwrap();

        assert!(matches!(store.set("theme", "light"), Err(StorageError::Io(..))));
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".folio/prefs.toml");

        let store = FileStore::open(&path).unwrap();
        store.set("theme", "light").unwrap();
        store.set("theme", "dark").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "theme = [").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StorageError::Parse(..))));
    }

    #[test]
    fn test_session_store_last_write_wins() {
        let store = SessionStore::default();
        assert_eq!(store.get("hasLoaded"), None);
        store.set("hasLoaded", "false").unwrap();
        store.set("hasLoaded", "true").unwrap();
        assert_eq!(store.get("hasLoaded").as_deref(), Some("true"));
    }
}
