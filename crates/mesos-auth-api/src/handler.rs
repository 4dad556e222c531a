use async_trait::async_trait;
use mesos_auth_model::{AuthConfig, ConfigPatch, Credential, TaskId, TaskPolicies};

use crate::error::ApiError;

/// Operations exposed to the hosting environment.
///
/// [`BackendAdapter`](crate::BackendAdapter) is the stock implementation; wrap
/// it to add extra checks (audit, rate limiting) in front of the backend.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    async fn login(&self, task_id: TaskId) -> Result<Credential, ApiError>;

    async fn renew(&self, cred: Credential) -> Result<Credential, ApiError>;

    async fn write_config(&self, patch: ConfigPatch) -> Result<AuthConfig, ApiError>;

    /// `None` until a config has been written.
    async fn read_config(&self) -> Result<Option<AuthConfig>, ApiError>;

    async fn write_task_policies(
        &self,
        prefix: String,
        policies: Vec<String>,
    ) -> Result<TaskPolicies, ApiError>;

    async fn read_task_policies(&self, prefix: String) -> Result<TaskPolicies, ApiError>;
}
