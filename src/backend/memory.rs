//! Memory Backend Module
//!
//! In-process storage adapter backed by a HashMap, suitable for tests and
//! single-process use.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::{Backend, CachedValue};
use crate::error::{CacheError, Result};

// == Memory Backend ==
/// In-memory storage adapter.
///
/// Always live; operations only fail if the interior lock is poisoned.
/// Entries persist until deleted or the backend is dropped.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: Mutex<HashMap<String, CachedValue>>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty MemoryBackend.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    // == Is Empty ==
    /// Returns true if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, HashMap<String, CachedValue>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Internal("Memory backend lock poisoned".to_string()))
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        Ok(self.lock_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: CachedValue) -> Result<bool> {
        self.lock_entries()?.insert(key.to_string(), value);
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.lock_entries()?.remove(key).is_some())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_new() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.len(), 0);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_backend_set_and_get() {
        let backend = MemoryBackend::new();

        backend
            .set("key1", CachedValue::Text("value1".to_string()))
            .unwrap();
        let value = backend.get("key1").unwrap();

        assert_eq!(value, Some(CachedValue::Text("value1".to_string())));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_backend_get_nonexistent() {
        let backend = MemoryBackend::new();

        let value = backend.get("nonexistent").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_backend_delete() {
        let backend = MemoryBackend::new();

        backend
            .set("key1", CachedValue::Text("value1".to_string()))
            .unwrap();
        let removed = backend.delete("key1").unwrap();

        assert!(removed);
        assert!(backend.is_empty());
        assert_eq!(backend.get("key1").unwrap(), None);
    }

    #[test]
    fn test_backend_delete_nonexistent() {
        let backend = MemoryBackend::new();

        let removed = backend.delete("nonexistent").unwrap();
        assert!(!removed);
    }

    #[test]
    fn test_backend_overwrite() {
        let backend = MemoryBackend::new();

        backend
            .set("key1", CachedValue::Text("value1".to_string()))
            .unwrap();
        backend
            .set("key1", CachedValue::Text("value2".to_string()))
            .unwrap();

        let value = backend.get("key1").unwrap();
        assert_eq!(value, Some(CachedValue::Text("value2".to_string())));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_stored_empty_value_is_not_a_miss() {
        let backend = MemoryBackend::new();

        backend
            .set("empty", CachedValue::Text(String::new()))
            .unwrap();

        let value = backend.get("empty").unwrap();
        assert_eq!(value, Some(CachedValue::Text(String::new())));
    }
}
