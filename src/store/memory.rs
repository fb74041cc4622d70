use crate::core::storage::KeyValueStore;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store. Used by tests and when the on-disk store cannot be opened.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        debug!("Store PUT for key: {key}");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
