//! Raw string key-value backends.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::StorageError;

/// A synchronous string key-value backend.
///
/// Writes are last-writer-wins; there is no transaction spanning keys.
pub trait KvBackend: Send + Sync {
    /// Get the raw value for a key.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set the raw value for a key.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory backend. Contents live as long as the backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-filled with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".to_string()))
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// File-backed store: a single JSON object mapping keys to string values.
///
/// The whole file is loaded on open and rewritten on every mutation through
/// a temporary file and a rename, so a crash never leaves a half-written
/// store behind.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty. An unreadable JSON document is also
    /// treated as empty; it is replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Open(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding unreadable store file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Open(format!("{}: {}", path.display(), e))),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Backend("file store lock poisoned".to_string()))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    // The in-memory map only changes once the file write has succeeded.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_delete() {
        let backend = MemoryBackend::new();
        backend.set("cart", "[]").unwrap();
        assert_eq!(backend.get("cart").unwrap().as_deref(), Some("[]"));

        backend.delete("cart").unwrap();
        assert_eq!(backend.get("cart").unwrap(), None);

        // Deleting again is fine
        backend.delete("cart").unwrap();
    }

    #[test]
    fn test_memory_with_entries() {
        let backend = MemoryBackend::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let backend = FileBackend::open(&path).unwrap();
            backend.set("totalPrice", "750000").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.get("totalPrice").unwrap().as_deref(), Some("750000"));
    }

    #[test]
    fn test_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_leaves_entries_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("store");
        let path = store_dir.join("store.json");

        let backend = FileBackend::open(&path).unwrap();
        backend.set("cart", "[1]").unwrap();

        // A plain file where the directory was makes every write fail
        fs::remove_dir_all(&store_dir).unwrap();
        fs::write(&store_dir, "").unwrap();

        assert!(backend.set("cart", "[1,2]").is_err());
        assert!(backend.set("totalPrice", "750000").is_err());
        assert!(backend.delete("cart").is_err());

        assert_eq!(backend.get("cart").unwrap().as_deref(), Some("[1]"));
        assert_eq!(backend.get("totalPrice").unwrap(), None);
        assert_eq!(backend.keys().unwrap(), vec!["cart"]);
    }

    #[test]
    fn test_file_garbage_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let backend = FileBackend::open(&path).unwrap();
        assert!(backend.keys().unwrap().is_empty());

        backend.set("cart", "[]").unwrap();
        let reopened = FileBackend::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));
    }
}
