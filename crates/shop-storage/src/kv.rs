//! Typed key-value store with automatic serialization.

use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{KvBackend, StorageError};

/// Type-safe store over a shared [`KvBackend`].
///
/// Values are serialized to JSON strings. Cloning a `Store` is cheap and
/// every clone sees the same backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl Store {
    /// Wrap a backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Wrap an already shared backend.
    pub fn from_shared(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let items: Option<Vec<LineItem>> = store.get("cart")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Get a value, treating a missing or unreadable entry as `T::default()`.
    ///
    /// Never fails: persisted data is best-effort.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable stored value");
                T::default()
            }
        }
    }

    /// Set a value in the store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// store.set("cart", &items)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// Get the raw string stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key)
    }

    /// Store a raw string without serialization.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value)
    }

    /// Delete a value from the store.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.backend.delete(key)
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.backend.get(key)?.is_some())
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.backend.keys()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Item {
        service: String,
        quantity: u32,
    }

    #[test]
    fn test_typed_roundtrip() {
        let store = Store::new(MemoryBackend::new());
        let items = vec![Item {
            service: "Hosting".to_string(),
            quantity: 2,
        }];

        store.set("cart", &items).unwrap();
        let loaded: Option<Vec<Item>> = store.get("cart").unwrap();
        assert_eq!(loaded, Some(items));
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = Store::new(MemoryBackend::new());
        let loaded: Option<Vec<Item>> = store.get("cart").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_malformed_is_error() {
        let store = Store::new(MemoryBackend::with_entries([("cart", "{oops")]));
        let loaded: Result<Option<Vec<Item>>, _> = store.get("cart");
        assert!(matches!(loaded, Err(StorageError::Serialize(_))));
    }

    #[test]
    fn test_get_or_default_swallows_garbage() {
        let store = Store::new(MemoryBackend::with_entries([("totalPrice", "NaN")]));
        let total: u64 = store.get_or_default("totalPrice");
        assert_eq!(total, 0);
    }

    #[test]
    fn test_clones_share_backend() {
        let a = Store::new(MemoryBackend::new());
        let b = a.clone();
        a.set_raw("totalPrice", "100").unwrap();
        assert!(b.exists("totalPrice").unwrap());
        assert_eq!(b.get::<u64>("totalPrice").unwrap(), Some(100));
    }

    #[test]
    fn test_delete() {
        let store = Store::new(MemoryBackend::new());
        store.set("k", &1u8).unwrap();
        store.delete("k").unwrap();
        assert!(!store.exists("k").unwrap());
        assert!(store.keys().unwrap().is_empty());
    }
}
