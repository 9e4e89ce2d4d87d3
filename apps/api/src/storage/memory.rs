use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_key, KeyValueStore, StorageError};

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
