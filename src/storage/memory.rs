//! In-memory key-value store
//!
//! Nothing survives the process. Used by tests and by callers that do not
//! want the token written to disk.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::error::StorageResult;
use super::KeyValueStore;

/// Process-local key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `key = value`
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries().insert(key.to_string(), value.to_string());
        store
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}
