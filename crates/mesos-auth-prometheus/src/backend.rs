use std::time::Duration;

use mesos_auth_core::{AuthMetrics, Outcome};
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder, proto::MetricFamily,
};

/// [`AuthMetrics`] backed by a private Prometheus [`Registry`].
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    logins: IntCounterVec,
    renewals: IntCounterVec,
    query_seconds: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let logins = IntCounterVec::new(
            Opts::new("mesos_auth_logins_total", "Login attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(logins.clone()))?;

        let renewals = IntCounterVec::new(
            Opts::new("mesos_auth_renewals_total", "Credential renewals by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(renewals.clone()))?;

        let query_seconds = HistogramVec::new(
            HistogramOpts::new(
                "mesos_auth_orchestrator_query_seconds",
                "Mesos master GET_TASKS latency, redirects included",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["result"],
        )?;
        registry.register(Box::new(query_seconds.clone()))?;

        Ok(Self {
            registry,
            logins,
            renewals,
            query_seconds,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Current values in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }
}

impl AuthMetrics for PrometheusMetrics {
    fn record_login(&self, outcome: Outcome) {
        self.logins.with_label_values(&[outcome.as_str()]).inc();
    }

    fn record_renew(&self, outcome: Outcome) {
        self.renewals.with_label_values(&[outcome.as_str()]).inc();
    }

    fn observe_query(&self, elapsed: Duration, ok: bool) {
        let result = if ok { "ok" } else { "error" };
        self.query_seconds
            .with_label_values(&[result])
            .observe(elapsed.as_secs_f64());
    }
}
