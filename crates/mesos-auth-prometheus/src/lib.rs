//! Prometheus metrics backend for the mesos auth backend.
//!
//! [`PrometheusMetrics`] implements [`mesos_auth_core::AuthMetrics`] on its own
//! registry.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use mesos_auth_core::{InmemStorage, MesosAuthBackend};
//! use mesos_auth_client::MesosConnector;
//! use mesos_auth_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = Arc::new(PrometheusMetrics::new()?);
//! let backend = MesosAuthBackend::new(Arc::new(InmemStorage::new()), MesosConnector::new(10)?)
//!     .with_metrics(metrics.clone());
//!
//! let text = metrics.encode()?;
//! # let _ = (backend, text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `mesos_auth_logins_total{outcome}` - Counter
//! - `mesos_auth_renewals_total{outcome}` - Counter
//! - `mesos_auth_orchestrator_query_seconds{result}` - Histogram
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; the daemon mounts [`PrometheusMetrics::encode`]
//! on its own router.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TEXT_FORMAT, TextEncoder};
