//! Structured logging
//!
//! [`init`] installs the process-wide `tracing` subscriber; [`TracingLogger`]
//! is the default [`Logger`] handed to every instrumentation.

use std::sync::Arc;

use opscope_common::{ErrorReport, Logger};
use opscope_domain::{LogConfig, LogFormat, OpscopeError, Result};
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `config.level` is an `EnvFilter` directive: a bare level such as `DEBUG`
/// (any case) or a full list like `info,opscope_core=debug`. Every line
/// carries target, file and line number.
///
/// # Errors
/// Returns `OpscopeError::Logging` if the level does not parse or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| {
        OpscopeError::Logging(format!("Invalid log level {:?}: {e}", config.level))
    })?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| OpscopeError::Logging(e.to_string()))?;
    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(())
}

/// [`Logger`] backed by `tracing` events.
///
/// `debug` becomes a `DEBUG` event; `exception` becomes an `ERROR` event with
/// `error_type`, `error` and `detail` fields. The optional name is attached
/// as a `logger` field.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    name: Option<Arc<str>>,
}

impl TracingLogger {
    /// Unnamed logger
    pub fn new() -> Self {
        Self::default()
    }

    /// Logger whose events carry `logger = name`
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into().into()) }
    }

    /// Name attached to events, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        match &self.name {
            Some(name) => tracing::debug!(logger = %name, "{message}"),
            None => tracing::debug!("{message}"),
        }
    }

    fn exception(&self, message: &str, error: &ErrorReport) {
        match &self.name {
            Some(name) => tracing::error!(
                logger = %name,
                error_type = error.type_name(),
                error = %error.message(),
                detail = %error.detail(),
                "{message}"
            ),
            None => tracing::error!(
                error_type = error.type_name(),
                error = %error.message(),
                detail = %error.detail(),
                "{message}"
            ),
        }
    }
}
