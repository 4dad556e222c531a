use std::sync::Arc;

use async_trait::async_trait;
use mesos_auth_core::MesosAuthBackend;
use mesos_auth_model::{AuthConfig, ConfigPatch, Credential, TaskId, TaskPolicies};
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// Bridges [`MesosAuthBackend`] to [`ApiHandler`].
///
/// Each request gets a child of the shutdown token, so stopping the daemon
/// aborts in-flight master queries.
pub struct BackendAdapter {
    backend: Arc<MesosAuthBackend>,
    shutdown: CancellationToken,
}

impl BackendAdapter {
    pub fn new(backend: Arc<MesosAuthBackend>) -> Self {
        Self {
            backend,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

#[async_trait]
impl ApiHandler for BackendAdapter {
    async fn login(&self, task_id: TaskId) -> Result<Credential, ApiError> {
        let ctx = self.shutdown.child_token();
        Ok(self.backend.login(&task_id, &ctx).await?)
    }

    async fn renew(&self, cred: Credential) -> Result<Credential, ApiError> {
        let ctx = self.shutdown.child_token();
        Ok(self.backend.renew(&cred, &ctx).await?)
    }

    async fn write_config(&self, patch: ConfigPatch) -> Result<AuthConfig, ApiError> {
        Ok(self.backend.write_config(patch).await?)
    }

    async fn read_config(&self) -> Result<Option<AuthConfig>, ApiError> {
        Ok(self.backend.read_config().await?)
    }

    async fn write_task_policies(
        &self,
        prefix: String,
        policies: Vec<String>,
    ) -> Result<TaskPolicies, ApiError> {
        Ok(self.backend.write_task_policies(&prefix, policies).await?)
    }

    async fn read_task_policies(&self, prefix: String) -> Result<TaskPolicies, ApiError> {
        Ok(self.backend.read_task_policies(&prefix).await?)
    }
}
