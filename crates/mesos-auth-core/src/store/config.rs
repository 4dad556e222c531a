use std::sync::Arc;

use mesos_auth_model::{AuthConfig, ConfigPatch};
use tracing::debug;

use crate::{
    error::AuthError,
    storage::{Storage, StorageEntry, StorageError},
    store::CONFIG_KEY,
};

/// The single backend configuration record.
#[derive(Clone)]
pub struct ConfigStore {
    storage: Arc<dyn Storage>,
}

impl ConfigStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Stored config, or `None` if it was never written.
    pub async fn get_or_none(&self) -> Result<Option<AuthConfig>, StorageError> {
        match self.storage.get(CONFIG_KEY).await? {
            Some(entry) => Ok(Some(entry.decode_json()?)),
            None => Ok(None),
        }
    }

    /// Stored config; serving traffic without one is refused.
    pub async fn get(&self) -> Result<AuthConfig, AuthError> {
        self.get_or_none().await?.ok_or(AuthError::NotConfigured)
    }

    /// Merge `patch` over the stored config (or the defaults) and persist the result.
    ///
    /// Nothing is written if the merged config is invalid.
    pub async fn write(&self, patch: ConfigPatch) -> Result<AuthConfig, AuthError> {
        let current = self.get_or_none().await?;
        let cfg = AuthConfig::merged(current, patch)
            .map_err(|e| AuthError::InvalidRequest(e.to_string()))?;

        self.storage.put(StorageEntry::json(CONFIG_KEY, &cfg)?).await?;
        debug!(base_url = %cfg.base_url, period_secs = cfg.period.as_secs(), "config stored");
        Ok(cfg)
    }
}
