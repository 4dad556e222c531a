use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mesos_auth_model::{
    AuthConfig, ConfigPatch, Credential, TaskId, TaskPolicies, format_period, parse_period,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /v1/login - Exchange a task id for a credential
    /// - POST /v1/renew - Renew a credential
    /// - GET|POST /v1/config - Read or update backend config
    /// - POST /v1/task-policies - Register policies for a prefix
    /// - GET /v1/task-policies/{prefix} - Read policies for a prefix
    pub fn router(self) -> Router {
        Router::new()
            .route("/v1/login", post(login::<H>))
            .route("/v1/renew", post(renew::<H>))
            .route("/v1/config", get(read_config::<H>).post(write_config::<H>))
            .route("/v1/task-policies", post(write_task_policies::<H>))
            .route("/v1/task-policies/{prefix}", get(read_task_policies::<H>))
            .with_state(self.handler)
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(rename = "task-id", default)]
    task_id: String,
}

/// Carries a credential both ways for login and renew.
#[derive(Debug, Serialize, Deserialize)]
struct AuthEnvelope {
    auth: Credential,
}

/// Seconds or a human duration such as `"7m"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PeriodField {
    Secs(u64),
    Text(String),
}

impl PeriodField {
    fn to_duration(&self) -> Result<Duration, ApiError> {
        match self {
            PeriodField::Secs(secs) => Ok(Duration::from_secs(*secs)),
            PeriodField::Text(text) => {
                parse_period(text).map_err(|e| ApiError::InvalidRequest(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WriteConfigRequest {
    #[serde(rename = "base-url", default)]
    base_url: Option<String>,
    #[serde(default, alias = "ttl")]
    period: Option<PeriodField>,
}

#[derive(Debug, Serialize)]
struct ConfigResponse {
    #[serde(rename = "base-url")]
    base_url: String,
    period: String,
    period_secs: u64,
}

impl From<AuthConfig> for ConfigResponse {
    fn from(cfg: AuthConfig) -> Self {
        Self {
            base_url: cfg.base_url,
            period: format_period(cfg.period),
            period_secs: cfg.period.as_secs(),
        }
    }
}

/// A JSON list, or one comma separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoliciesField {
    List(Vec<String>),
    Csv(String),
}

impl PoliciesField {
    fn into_vec(self) -> Vec<String> {
        match self {
            PoliciesField::List(list) => list,
            PoliciesField::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WriteTaskPoliciesRequest {
    #[serde(rename = "task-id-prefix", default)]
    prefix: String,
    #[serde(default)]
    policies: Option<PoliciesField>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/login
async fn login<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let auth = handler.login(TaskId::from(req.task_id)).await?;
    Ok(Json(AuthEnvelope { auth }))
}

/// POST /v1/renew
async fn renew<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<AuthEnvelope>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let auth = handler.renew(req.auth).await?;
    Ok(Json(AuthEnvelope { auth }))
}

/// GET /v1/config
async fn read_config<H>(State(handler): State<Arc<H>>) -> Result<Response, ApiError>
where
    H: ApiHandler,
{
    Ok(match handler.read_config().await? {
        Some(cfg) => Json(ConfigResponse::from(cfg)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// POST /v1/config
async fn write_config<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<WriteConfigRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let mut patch = ConfigPatch::default();
    if let Some(base_url) = req.base_url {
        patch = patch.with_base_url(base_url);
    }
    if let Some(period) = &req.period {
        patch = patch.with_period(period.to_duration()?);
    }

    let cfg = handler.write_config(patch).await?;
    Ok(Json(ConfigResponse::from(cfg)))
}

/// POST /v1/task-policies
async fn write_task_policies<H>(
    State(handler): State<Arc<H>>,
    Json(req): Json<WriteTaskPoliciesRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let policies = req.policies.map(PoliciesField::into_vec).unwrap_or_default();
    let stored: TaskPolicies = handler.write_task_policies(req.prefix, policies).await?;
    Ok(Json(stored))
}

/// GET /v1/task-policies/{prefix}
async fn read_task_policies<H>(
    State(handler): State<Arc<H>>,
    Path(prefix): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.read_task_policies(prefix).await?))
}

#[cfg(test)]
mod tests;
