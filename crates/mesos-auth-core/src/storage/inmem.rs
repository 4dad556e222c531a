use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use super::{Storage, StorageEntry, StorageError};

/// Process-local storage. Clones share the same map.
#[derive(Clone, Default)]
pub struct InmemStorage {
    inner: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl InmemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Backend("in-memory storage lock poisoned".to_string())
}

#[async_trait]
impl Storage for InmemStorage {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.get(key).map(|value| StorageEntry {
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.insert(entry.key, entry.value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
