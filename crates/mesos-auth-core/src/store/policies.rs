use std::sync::Arc;

use mesos_auth_model::{AppPrefix, TaskPolicies};

use crate::{
    storage::{Storage, StorageEntry, StorageError},
    store::task_policies_key,
};

/// Policies registered per application prefix.
#[derive(Clone)]
pub struct PolicyStore {
    storage: Arc<dyn Storage>,
}

impl PolicyStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Policies for `prefix`; `None` means nothing was ever registered,
    /// which is not the same as an empty list.
    pub async fn get(&self, prefix: &AppPrefix) -> Result<Option<TaskPolicies>, StorageError> {
        match self.storage.get(&task_policies_key(prefix.as_str())).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }

    /// Replace whatever is registered for `prefix`.
    pub async fn put(&self, prefix: &AppPrefix, policies: &TaskPolicies) -> Result<(), StorageError> {
        let entry = StorageEntry::json(task_policies_key(prefix.as_str()), policies)?;
        self.storage.put(entry).await
    }
}
