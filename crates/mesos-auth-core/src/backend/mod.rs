use std::{sync::Arc, time::Instant};

use mesos_auth_client::{ClientError, MesosConnector, TaskRegistry};
use mesos_auth_model::{
    AppPrefix, AuthConfig, ConfigPatch, Credential, TaskId, TaskPolicies,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AuthError,
    ledger::{Claim, LoginLedger},
    metrics::{AuthMetrics, NoopMetrics, Outcome},
    storage::Storage,
    store::{ConfigStore, PolicyStore},
};

/// Issues and renews credentials for tasks running under a Mesos master.
///
/// Every decision re-queries the master; nothing about tasks is cached between
/// calls. Login refusals are reported uniformly as
/// [`AuthError::PermissionDenied`] whatever check failed.
pub struct MesosAuthBackend {
    config: ConfigStore,
    policies: PolicyStore,
    ledger: LoginLedger,
    connector: MesosConnector,
    metrics: Arc<dyn AuthMetrics>,
}

impl MesosAuthBackend {
    pub fn new(storage: Arc<dyn Storage>, connector: MesosConnector) -> Self {
        Self {
            config: ConfigStore::new(Arc::clone(&storage)),
            policies: PolicyStore::new(Arc::clone(&storage)),
            ledger: LoginLedger::new(storage),
            connector,
            metrics: Arc::new(NoopMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn AuthMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Exchange a task id for a credential, at most once per id.
    #[instrument(level = "info", skip_all, fields(task_id = %task_id))]
    pub async fn login(&self, task_id: &TaskId, ctx: &CancellationToken) -> Result<Credential, AuthError> {
        let res = self.try_login(task_id, ctx).await;
        self.metrics.record_login(outcome_of(&res));

        match &res {
            Ok(cred) => info!(
                policies = ?cred.policies,
                period_secs = cred.period.as_secs(),
                "login granted"
            ),
            Err(AuthError::PermissionDenied) => info!("login denied"),
            Err(e) => warn!(error = %e, "login failed"),
        }
        res
    }

    async fn try_login(&self, task_id: &TaskId, ctx: &CancellationToken) -> Result<Credential, AuthError> {
        if task_id.is_empty() {
            debug!("empty task id");
            return Err(AuthError::PermissionDenied);
        }

        let cfg = self.config.get().await?;
        let registry = self.query(&cfg, ctx).await?;
        if !registry.is_task_active(task_id.as_str()) {
            debug!("task is not active");
            return Err(AuthError::PermissionDenied);
        }

        let prefix = match task_id.prefix() {
            Ok(prefix) => prefix,
            Err(e) => {
                debug!(error = %e, "cannot derive prefix");
                return Err(AuthError::PermissionDenied);
            }
        };

        let Some(policies) = self.policies.get(&prefix).await? else {
            debug!(%prefix, "no policies registered");
            return Err(AuthError::PermissionDenied);
        };

        match self.ledger.try_claim(&prefix, task_id).await? {
            Claim::Claimed => Ok(Credential::issue(policies.policies, cfg.period, task_id)),
            Claim::AlreadyClaimed => {
                debug!(%prefix, "task id already used to log in");
                Err(AuthError::PermissionDenied)
            }
        }
    }

    /// Refresh a credential's period while its task keeps running.
    ///
    /// The input is left untouched; the returned copy carries the currently
    /// configured period.
    #[instrument(level = "info", skip_all)]
    pub async fn renew(&self, cred: &Credential, ctx: &CancellationToken) -> Result<Credential, AuthError> {
        let res = self.try_renew(cred, ctx).await;
        self.metrics.record_renew(outcome_of(&res));

        match &res {
            Ok(renewed) => info!(
                task_id = ?cred.task_id(),
                period_secs = renewed.period.as_secs(),
                "credential renewed"
            ),
            Err(e) => warn!(task_id = ?cred.task_id(), error = %e, "renewal refused"),
        }
        res
    }

    async fn try_renew(&self, cred: &Credential, ctx: &CancellationToken) -> Result<Credential, AuthError> {
        let task_id = cred.task_id().ok_or(AuthError::MissingTaskId)?;
        let cfg = self.config.get().await?;

        let registry = self.query(&cfg, ctx).await?;
        if !registry.is_task_active(task_id.as_str()) {
            return Err(AuthError::TaskNotFound(task_id.to_string()));
        }
        Ok(cred.with_period(cfg.period))
    }

    async fn query(&self, cfg: &AuthConfig, ctx: &CancellationToken) -> Result<TaskRegistry, ClientError> {
        let started = Instant::now();
        let res = self.connector.connect(&cfg.base_url).task_registry(ctx).await;
        self.metrics.observe_query(started.elapsed(), res.is_ok());
        res
    }

    /// Merge `patch` into the stored configuration.
    pub async fn write_config(&self, patch: ConfigPatch) -> Result<AuthConfig, AuthError> {
        let cfg = self.config.write(patch).await?;
        info!(base_url = %cfg.base_url, period_secs = cfg.period.as_secs(), "config written");
        Ok(cfg)
    }

    pub async fn read_config(&self) -> Result<Option<AuthConfig>, AuthError> {
        Ok(self.config.get_or_none().await?)
    }

    /// Replace the policies granted to tasks under `prefix`.
    ///
    /// Blank entries are dropped; at least one policy must remain.
    pub async fn write_task_policies(
        &self,
        prefix: &str,
        policies: Vec<String>,
    ) -> Result<TaskPolicies, AuthError> {
        let prefix = admin_prefix(prefix)?;
        let policies = TaskPolicies::new(
            policies
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        );
        if policies.is_empty() {
            return Err(AuthError::InvalidRequest(
                "missing or invalid policies".to_string(),
            ));
        }

        self.policies.put(&prefix, &policies).await?;
        info!(%prefix, policies = ?policies.policies, "task policies written");
        Ok(policies)
    }

    /// Policies registered for `prefix`; empty if none.
    pub async fn read_task_policies(&self, prefix: &str) -> Result<TaskPolicies, AuthError> {
        let prefix = admin_prefix(prefix)?;
        Ok(self.policies.get(&prefix).await?.unwrap_or_default())
    }
}

fn admin_prefix(prefix: &str) -> Result<AppPrefix, AuthError> {
    AppPrefix::new(prefix.trim()).map_err(|e| AuthError::InvalidRequest(e.to_string()))
}

fn outcome_of<T>(res: &Result<T, AuthError>) -> Outcome {
    match res {
        Ok(_) => Outcome::Success,
        Err(AuthError::PermissionDenied | AuthError::TaskNotFound(_) | AuthError::MissingTaskId) => {
            Outcome::Denied
        }
        Err(_) => Outcome::Error,
    }
}
