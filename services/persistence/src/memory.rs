//! In-process store

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::store::{StateStore, StoreError, StoreKey};

/// Keeps values in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<StoreKey, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that hold a value
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().get(&key).cloned())
    }

    fn write(&self, key: StoreKey, value: &Value) -> Result<(), StoreError> {
        self.values.write().insert(key, value.clone());
        Ok(())
    }
}
