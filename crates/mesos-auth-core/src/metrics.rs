//! Metrics seam for the credential lifecycle.
//!
//! Core only reports what happened; exporting is up to the implementation
//! (see `mesos-auth-prometheus`).

use std::time::Duration;

/// How a login or renewal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    /// Refused for an authorization reason, or the task is gone.
    Denied,
    /// Infrastructure failure: orchestrator, storage or configuration.
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Denied => "denied",
            Outcome::Error => "error",
        }
    }
}

pub trait AuthMetrics: Send + Sync + 'static {
    fn record_login(&self, outcome: Outcome);

    fn record_renew(&self, outcome: Outcome);

    /// Latency of one orchestrator query, redirects included.
    fn observe_query(&self, elapsed: Duration, ok: bool);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl AuthMetrics for NoopMetrics {
    fn record_login(&self, _outcome: Outcome) {}

    fn record_renew(&self, _outcome: Outcome) {}

    fn observe_query(&self, _elapsed: Duration, _ok: bool) {}
}
