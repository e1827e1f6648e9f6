//! In-memory cache store for tests and cache-less runs.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{CachePort, StoreError};

/// HashMap-backed store with no persistence.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CachePort for MemoryStore {
    fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.entries.lock().expect("cache lock").get(key).cloned())
    }

    fn set_value(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("cache lock")
            .insert(key.to_string(), value);
        Ok(())
    }
}
