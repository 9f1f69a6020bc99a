//! Durable key-value storage
//!
//! The domain store persists each collection as one JSON string under a
//! fixed key. Two backends exist: files in a data directory for the
//! running service and an in-memory map for tests.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// String-keyed persistence collaborator.
///
/// Calls are synchronous and may block on I/O. The domain store invokes
/// them while holding its write lock on an async worker thread, so
/// implementations must stay small and local (a few KB per key on local
/// disk or in memory); a remote backend would need its own async seam.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Check the backend still accepts writes
    fn probe(&self) -> Result<()> {
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!(key, bytes = value.len(), "Persisted key");
        Ok(())
    }

    fn probe(&self) -> Result<()> {
        self.set(".probe", "ok")
    }
}

/// In-memory store, cloneable so tests can inspect what was written
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw values
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();
        assert_eq!(store.get("fitpulse_members").unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();

        store.set("fitpulse_templates", "[]").unwrap();
        store.set("fitpulse_templates", "[1]").unwrap();

        assert_eq!(store.get("fitpulse_templates").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("fitpulse_templates.json").exists());
        assert!(!dir.path().join("fitpulse_templates.json.tmp").exists());
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKvStore::open(&nested).unwrap();
        assert!(store.probe().is_ok());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryKvStore::new();
        let view = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(view.get("k").unwrap().as_deref(), Some("v"));
    }
}
