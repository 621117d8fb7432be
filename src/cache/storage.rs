//! Session storage trait and backends.
//!
//! The cache manager only ever talks to a [`SessionStorage`]. Which backend
//! sits behind it is decided once, at construction.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StorageError;

/// Raw string key-value storage scoped to one session.
pub trait SessionStorage: Send + Sync {
    /// Read the raw value stored under a physical key.
    fn raw_get(&self, key: &str) -> Option<String>;

    /// Write a raw value, replacing any previous one.
    fn raw_set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a physical key. Missing keys are ignored.
    fn raw_remove(&self, key: &str);

    /// List every physical key currently stored.
    fn raw_keys(&self) -> Vec<String>;
}

/// Storage that doesn't cache anything.
/// Used when no session store exists - all operations are no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStorage;

impl SessionStorage for NullStorage {
    fn raw_get(&self, _key: &str) -> Option<String> {
        None // Always miss
    }

    fn raw_set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Ok(()) // Discard
    }

    fn raw_remove(&self, _key: &str) {}

    fn raw_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// In-process session store with an optional byte quota.
///
/// Usage is measured as the sum of key and value lengths, like a browser
/// session store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        match self.items.lock() {
            Ok(items) => usage(&items),
            Err(_) => 0,
        }
    }

    /// Number of physical keys stored.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn usage(items: &HashMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl SessionStorage for MemoryStorage {
    fn raw_get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn raw_set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("lock poisoned: {}", e)))?;

        if let Some(quota) = self.quota_bytes {
            let replaced = items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let needed = usage(&items) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        items.insert(key.to_string(), value);
        Ok(())
    }

    fn raw_remove(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }

    fn raw_keys(&self) -> Vec<String> {
        self.items
            .lock()
            .map(|items| items.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_remove() {
        let storage = MemoryStorage::new();

        storage.raw_set("a", "1".to_string()).unwrap();
        assert_eq!(storage.raw_get("a").as_deref(), Some("1"));
        assert_eq!(storage.raw_keys(), vec!["a".to_string()]);

        storage.raw_remove("a");
        assert!(storage.raw_get("a").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_remove_missing_is_noop() {
        let storage = MemoryStorage::new();
        storage.raw_remove("missing");
        storage.raw_remove("missing");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);

        storage.raw_set("k", "12345".to_string()).unwrap();
        assert_eq!(storage.used_bytes(), 6);

        let err = storage.raw_set("k2", "123456789".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
        assert!(storage.raw_get("k2").is_none());
    }

    #[test]
    fn test_memory_quota_counts_replacement() {
        let storage = MemoryStorage::with_quota(10);

        storage.raw_set("k", "123456789".to_string()).unwrap();
        // Replacing the same key frees the old value first
        storage.raw_set("k", "987654321".to_string()).unwrap();
        assert_eq!(storage.raw_get("k").as_deref(), Some("987654321"));
    }

    #[test]
    fn test_null_storage_always_misses() {
        let storage = NullStorage;

        storage.raw_set("a", "1".to_string()).unwrap();
        assert!(storage.raw_get("a").is_none());
        assert!(storage.raw_keys().is_empty());
        storage.raw_remove("a");
    }
}
