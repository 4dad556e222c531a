//! Durable key/value storage supplied by the hosting environment.

mod inmem;
pub use inmem::InmemStorage;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// One stored record: a key and its JSON-encoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl StorageEntry {
    pub fn json<T>(key: impl Into<String>, value: &T) -> Result<Self, StorageError>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        match serde_json::to_vec(value) {
            Ok(value) => Ok(Self { key, value }),
            Err(source) => Err(StorageError::Encode { key, source }),
        }
    }

    pub fn decode_json<T>(&self) -> Result<T, StorageError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.value).map_err(|source| StorageError::Decode {
            key: self.key.clone(),
            source,
        })
    }
}

/// Key/value storage the backend keeps its records in.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError>;

    /// Create or overwrite `entry.key`.
    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError>;

    /// Remove a key; removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Keys starting with `prefix`, in lexical order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
