use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("malformed task-id: {0:?}")]
    MalformedTaskId(String),

    #[error("missing or invalid task-id-prefix")]
    EmptyPrefix,

    #[error("base-url not configured")]
    BaseUrlNotConfigured,

    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}
