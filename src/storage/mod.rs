//! Durable-storage collaborators for cart snapshots
//!
//! Storage is a keyed blob slot: one serialized cart per key. Backends only
//! ever see whole snapshots (the store layer never writes partial deltas),
//! so the last completed `save` always holds a structurally complete cart.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Storage name under which the active cart snapshot lives.
pub const CART_STORAGE_KEY: &str = "cart-storage";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key-value blob slot holding serialized cart snapshots.
pub trait CartStorage {
    /// Persist `snapshot` under `key`, replacing any previous value.
    fn save(&self, key: &str, snapshot: &str) -> Result<()>;

    /// The last snapshot saved under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<String>>;
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock only means a writer panicked mid-insert; the map
        // itself is still a valid set of whole snapshots.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CartStorage for InMemoryStorage {
    fn save(&self, key: &str, snapshot: &str) -> Result<()> {
        self.slots().insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots().get(key).cloned())
    }
}

/// File-per-key storage rooted at a directory: key `k` lives at
/// `<root>/k.json`.
#[derive(Debug)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Create the backend, creating `root` if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl CartStorage for JsonFileStorage {
    fn save(&self, key: &str, snapshot: &str) -> Result<()> {
        // Write to a sibling temp file and rename over the slot so a crash
        // mid-write never leaves a torn snapshot behind.
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, snapshot)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let storage = InMemoryStorage::new();
        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());

        storage.save(CART_STORAGE_KEY, r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.load(CART_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
    }

    #[test]
    fn test_in_memory_save_overwrites() {
        let storage = InMemoryStorage::new();
        storage.save("k", "first").unwrap();
        storage.save("k", "second").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_keys_are_isolated() {
        let storage = InMemoryStorage::new();
        storage.save("a", "cart-a").unwrap();
        assert!(storage.load("b").unwrap().is_none());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());
        storage.save(CART_STORAGE_KEY, r#"{"items":[]}"#).unwrap();
        assert_eq!(
            storage.load(CART_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"items":[]}"#)
        );
        assert!(dir.path().join("cart-storage.json").exists());
    }

    #[test]
    fn test_file_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        storage.save("k", "first").unwrap();
        storage.save("k", "second").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("cart");
        let storage = JsonFileStorage::new(&nested).unwrap();

        storage.save("k", "v").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("v"));
        assert!(nested.exists());
    }
}
