//! Telemetry configuration structures
//!
//! Every field has a default matching the environment defaults in
//! [`crate::constants`], so partial TOML/JSON files deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_STATSD_HOST, DEFAULT_STATSD_MAXUDPSIZE, DEFAULT_STATSD_PORT,
    DEFAULT_STATSD_PREFIX,
};
use crate::impl_str_enum_conversions;

/// Top-level configuration resolved once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Structured log settings
    pub log: LogConfig,
    /// Statsd sink settings
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Same configuration with the metrics sink switched off.
    #[must_use]
    pub fn without_metrics(mut self) -> Self {
        self.metrics.enabled = false;
        self
    }
}

/// Output layout for the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// Single-line human readable output
    Compact,
    /// One JSON object per line
    Json,
}

impl_str_enum_conversions!(LogFormat {
    Pretty => "pretty",
    Compact => "compact",
    Json => "json",
});

/// Structured log settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default threshold, e.g. `DEBUG` or a full filter directive
    pub level: String,
    /// Output layout
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::default() }
    }
}

/// Statsd sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Attach a metrics sink at all
    pub enabled: bool,
    /// Statsd host name or address
    pub host: String,
    /// Statsd UDP port
    pub port: u16,
    /// Prefix prepended to every metric key
    pub prefix: String,
    /// Upper bound for a single datagram when pipelining
    pub max_datagram_size: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: DEFAULT_STATSD_HOST.to_string(),
            port: DEFAULT_STATSD_PORT,
            prefix: DEFAULT_STATSD_PREFIX.to_string(),
            max_datagram_size: DEFAULT_STATSD_MAXUDPSIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log.level, "DEBUG");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.host, "localhost");
        assert_eq!(config.metrics.port, 8125);
        assert_eq!(config.metrics.prefix, "dev.app");
        assert_eq!(config.metrics.max_datagram_size, 512);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TelemetryConfig = toml::from_str(
            r#"
            [metrics]
            enabled = true
            port = 9125
            "#,
        )
        .unwrap();

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.port, 9125);
        assert_eq!(config.metrics.host, "localhost");
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_log_format_json_roundtrip_name() {
        let config: LogConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "DEBUG");
        assert_eq!("COMPACT".parse::<LogFormat>(), Ok(LogFormat::Compact));
    }

    #[test]
    fn test_without_metrics() {
        let mut config = TelemetryConfig::default();
        config.metrics.enabled = true;
        assert!(!config.without_metrics().metrics.enabled);
    }
}
