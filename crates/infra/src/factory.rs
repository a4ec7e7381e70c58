//! Instrumentation factory
//!
//! Resolves sinks once at startup and hands out pre-seeded
//! [`InstrumentationBuilder`]s, one per namespace.

use std::sync::Arc;

use opscope_common::{Logger, MetricsClient};
use opscope_core::{Instrumentation, InstrumentationBuilder};
use opscope_domain::{Result, TelemetryConfig};

use crate::config;
use crate::observability::{StatsdClient, StatsdPipeline, TracingLogger};

/// Shared sinks for every instrumentation of a process.
///
/// Cloning shares the sinks.
#[derive(Debug, Clone)]
pub struct TelemetryFactory {
    logger: Arc<dyn Logger>,
    metrics: Option<Arc<dyn MetricsClient>>,
    statsd: Option<Arc<StatsdClient>>,
}

impl TelemetryFactory {
    /// Factory over explicitly provided sinks
    pub fn new(logger: Arc<dyn Logger>, metrics: Option<Arc<dyn MetricsClient>>) -> Self {
        Self { logger, metrics, statsd: None }
    }

    /// Factory for `config`: a [`TracingLogger`], plus a [`StatsdClient`]
    /// when metrics are enabled.
    ///
    /// # Errors
    /// Returns `OpscopeError::Metrics` if metrics are enabled and the statsd
    /// client cannot be created.
    pub fn try_from_config(config: &TelemetryConfig) -> Result<Self> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

        if !config.metrics.enabled {
            return Ok(Self::new(logger, None));
        }

        let client = Arc::new(StatsdClient::from_config(&config.metrics)?);
        tracing::info!(
            host = %config.metrics.host,
            port = config.metrics.port,
            prefix = %config.metrics.prefix,
            max_datagram_size = client.max_datagram_size(),
            "Statsd metrics enabled"
        );

        let metrics: Arc<dyn MetricsClient> = client.clone();
        Ok(Self { logger, metrics: Some(metrics), statsd: Some(client) })
    }

    /// Same as [`TelemetryFactory::try_from_config`], but a statsd client
    /// that cannot be created is logged and left out; the factory then only
    /// logs.
    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::try_from_config(config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Statsd unavailable, continuing without metrics");
            Self::new(Arc::new(TracingLogger::new()), None)
        })
    }

    /// Factory configured from the process environment.
    ///
    /// Never fails: an invalid variable is logged and the defaults are used
    /// with metrics switched off.
    pub fn from_env() -> Self {
        let config = config::load_from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid telemetry configuration, using defaults");
            TelemetryConfig::default().without_metrics()
        });
        Self::from_config(&config)
    }

    /// Builder for an instrumentation of `namespace`, seeded with this
    /// factory's sinks.
    ///
    /// The caller may still set `.logger(..)`, `.label(..)` or `.reraise(..)`.
    pub fn telemetry(&self, namespace: impl Into<String>) -> InstrumentationBuilder {
        Instrumentation::builder(namespace, Arc::clone(&self.logger))
            .maybe_metrics(self.metrics.clone())
    }

    /// Shorthand for `telemetry(namespace).build()`
    pub fn instrumentation(&self, namespace: impl Into<String>) -> Instrumentation {
        self.telemetry(namespace).build()
    }

    /// The shared logger
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// The shared metrics sink, if one is attached
    pub fn metrics(&self) -> Option<&Arc<dyn MetricsClient>> {
        self.metrics.as_ref()
    }

    /// Fresh buffering pipeline over the configured statsd client.
    ///
    /// Datagrams are packed up to the configured `max_datagram_size`. `None`
    /// when the factory has no statsd client.
    pub fn pipeline(&self) -> Option<StatsdPipeline> {
        self.statsd.as_ref().map(StatsdClient::pipeline)
    }
}

impl Default for TelemetryFactory {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogger::new()), None)
    }
}
