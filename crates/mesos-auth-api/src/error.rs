use mesos_auth_client::ClientError;
use mesos_auth_core::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("task {0} not found")]
    TaskNotFound(String),

    #[error("backend not configured")]
    NotConfigured,

    #[error("request cancelled")]
    Cancelled,

    /// The Mesos master could not be reached or answered nonsense.
    #[error("orchestrator error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PermissionDenied => ApiError::PermissionDenied,
            AuthError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            AuthError::TaskNotFound(id) => ApiError::TaskNotFound(id),
            AuthError::NotConfigured => ApiError::NotConfigured,
            AuthError::MissingTaskId => ApiError::InvalidRequest(AuthError::MissingTaskId.to_string()),
            AuthError::Client(ClientError::Cancelled) => ApiError::Cancelled,
            AuthError::Client(e) => ApiError::Upstream(e.to_string()),
            AuthError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::{Json, http::StatusCode};

        let status = match &self {
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotConfigured | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = serde_json::json!({ "errors": [self.to_string()] });
        (status, Json(body)).into_response()
    }
}
