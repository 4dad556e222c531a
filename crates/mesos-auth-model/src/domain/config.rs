use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ModelError, domain::duration_secs};

/// Period applied to issued credentials when none was configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Backend configuration, stored as a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Mesos master base URL, e.g. `"http://master.mesos:5050"`.
    pub base_url: String,
    /// Renewal period of issued credentials.
    #[serde(rename = "period_secs", with = "duration_secs")]
    pub period: Duration,
}

impl Default for AuthConfig {
    /// Starting point for a config that has never been written.
    ///
    /// Not a valid config on its own: `base_url` is empty.
    fn default() -> Self {
        Self {
            base_url: String::new(),
            period: DEFAULT_PERIOD,
        }
    }
}

/// Fields supplied by a config write; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub base_url: Option<String>,
    pub period: Option<Duration>,
}

impl ConfigPatch {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

impl AuthConfig {
    /// Apply `patch` over `current` (or over the defaults if nothing is stored yet).
    ///
    /// Fails if the merged config has no base URL.
    pub fn merged(current: Option<AuthConfig>, patch: ConfigPatch) -> Result<Self, ModelError> {
        let mut cfg = current.unwrap_or_default();
        if let Some(base_url) = patch.base_url {
            cfg.base_url = base_url;
        }
        if let Some(period) = patch.period {
            cfg.period = period;
        }
        if cfg.base_url.is_empty() {
            return Err(ModelError::BaseUrlNotConfigured);
        }
        Ok(cfg)
    }
}

/// Parse a period given either as whole seconds (`"420"`) or a human duration (`"7m"`, `"42s"`).
pub fn parse_period(value: &str) -> Result<Duration, ModelError> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(value).map_err(|e| ModelError::InvalidPeriod(format!("{value:?}: {e}")))
}

/// Render a period the way config reads report it, e.g. `"7m"`.
pub fn format_period(period: Duration) -> String {
    humantime::format_duration(period).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_onto_nothing_needs_base_url() {
        let patch = ConfigPatch::default().with_period(Duration::from_secs(42));
        assert_eq!(
            AuthConfig::merged(None, patch),
            Err(ModelError::BaseUrlNotConfigured)
        );
    }

    #[test]
    fn merge_onto_nothing_uses_default_period() {
        let patch = ConfigPatch::default().with_base_url("http://master.mesos:5050");
        let cfg = AuthConfig::merged(None, patch).unwrap();
        assert_eq!(cfg.base_url, "http://master.mesos:5050");
        assert_eq!(cfg.period, DEFAULT_PERIOD);
    }

    #[test]
    fn merge_keeps_unsupplied_fields() {
        let current = AuthConfig {
            base_url: "http://master.mesos:5050".into(),
            period: Duration::from_secs(42),
        };

        let cfg = AuthConfig::merged(
            Some(current.clone()),
            ConfigPatch::default().with_period(Duration::from_secs(420)),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://master.mesos:5050");
        assert_eq!(cfg.period, Duration::from_secs(420));

        let cfg = AuthConfig::merged(
            Some(cfg),
            ConfigPatch::default().with_base_url("http://localhost:5050"),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:5050");
        assert_eq!(cfg.period, Duration::from_secs(420));
    }

    #[test]
    fn merge_rejects_clearing_base_url() {
        let current = AuthConfig {
            base_url: "http://master.mesos:5050".into(),
            period: DEFAULT_PERIOD,
        };
        let patch = ConfigPatch::default().with_base_url("");
        assert_eq!(
            AuthConfig::merged(Some(current), patch),
            Err(ModelError::BaseUrlNotConfigured)
        );
    }

    #[test]
    fn stored_form_uses_seconds() {
        let cfg = AuthConfig {
            base_url: "http://master".into(),
            period: Duration::from_secs(420),
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"base_url": "http://master", "period_secs": 420})
        );
    }

    #[test]
    fn period_parsing() {
        assert_eq!(parse_period("42").unwrap(), Duration::from_secs(42));
        assert_eq!(parse_period("42s").unwrap(), Duration::from_secs(42));
        assert_eq!(parse_period("7m").unwrap(), Duration::from_secs(420));
        assert!(matches!(parse_period("soon"), Err(ModelError::InvalidPeriod(_))));
    }

    #[test]
    fn period_formatting() {
        assert_eq!(format_period(Duration::from_secs(420)), "7m");
        assert_eq!(format_period(Duration::from_secs(42)), "42s");
    }
}
