use mesos_auth_client::ClientError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Uniform login refusal; deliberately says nothing about which check failed.
    #[error("permission denied")]
    PermissionDenied,

    #[error("backend not configured")]
    NotConfigured,

    #[error("task {0} not found during renewal")]
    TaskNotFound(String),

    #[error("task-id missing from credential internal data")]
    MissingTaskId,

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
