//! Configuration loader
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory (or a parent) seeds the process
//!    environment; variables already set win
//! 2. If a config file is found by [`probe_config_paths`], it is used
//! 3. Otherwise settings are read from environment variables, each falling
//!    back to its default
//!
//! ## Environment Variables
//! - `LOG_LEVEL`: default log threshold (default `DEBUG`)
//! - `LOG_FORMAT`: `pretty`, `compact` or `json` (default `pretty`)
//! - `STATSD_ON`: attach the statsd sink; `true`/`ok`/`yes` in any case
//!   (default off)
//! - `STATSD_HOST`: statsd host (default `localhost`)
//! - `STATSD_PORT`: statsd UDP port (default `8125`)
//! - `STATSD_PREFIX`: prefix for every metric key (default `dev.app`)
//! - `STATSD_MAXUDPSIZE`: datagram size limit for pipelined sends (default
//!   `512`)
//!
//! ## File Locations
//! `opscope.toml` or `opscope.json`, first in the working directory, then
//! next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use opscope_domain::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_STATSD_HOST, DEFAULT_STATSD_MAXUDPSIZE, DEFAULT_STATSD_PORT,
    DEFAULT_STATSD_PREFIX, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_STATSD_HOST, ENV_STATSD_MAXUDPSIZE,
    ENV_STATSD_ON, ENV_STATSD_PORT, ENV_STATSD_PREFIX, TRUTHY_VALUES,
};
use opscope_domain::{LogConfig, LogFormat, MetricsConfig, OpscopeError, Result, TelemetryConfig};

const CONFIG_FILE_NAMES: [&str; 2] = ["opscope.toml", "opscope.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `OpscopeError::Config` if the selected source holds an invalid
/// value.
pub fn load() -> Result<TelemetryConfig> {
    load_dotenv();

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config file found, reading environment");
            load_from_env()
        }
    }
}

/// Seed the process environment from a `.env` file, if there is one.
///
/// Returns the path that was loaded. A missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load .env file");
            None
        }
    }
}

/// Load configuration from environment variables
///
/// Every variable is optional. See module documentation for the list.
///
/// # Errors
/// Returns `OpscopeError::Config` if a numeric variable or `LOG_FORMAT`
/// cannot be parsed.
pub fn load_from_env() -> Result<TelemetryConfig> {
    let level = env_or(ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL);
    let format = env_parse(ENV_LOG_FORMAT, LogFormat::default(), "log format")?;

    let enabled = env_bool(ENV_STATSD_ON, false);
    let host = env_or(ENV_STATSD_HOST, DEFAULT_STATSD_HOST);
    let port = env_parse(ENV_STATSD_PORT, DEFAULT_STATSD_PORT, "statsd port")?;
    let prefix = env_or(ENV_STATSD_PREFIX, DEFAULT_STATSD_PREFIX);
    let max_datagram_size =
        env_parse(ENV_STATSD_MAXUDPSIZE, DEFAULT_STATSD_MAXUDPSIZE, "statsd max UDP size")?;

    Ok(TelemetryConfig {
        log: LogConfig { level, format },
        metrics: MetricsConfig { enabled, host, port, prefix, max_datagram_size },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. TOML and JSON are
/// supported, detected by file extension; missing fields take their
/// defaults.
///
/// # Errors
/// Returns `OpscopeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<TelemetryConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OpscopeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            OpscopeError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading telemetry configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OpscopeError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration, picking the format from the extension of `path`.
fn parse_config(contents: &str, path: &Path) -> Result<TelemetryConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OpscopeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OpscopeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(OpscopeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional variable, `default` when unset.
fn env_parse<T>(key: &str, default: T, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| OpscopeError::Config(format!("Invalid {what} in {key}={raw:?}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Only the values in [`TRUTHY_VALUES`] count as on (case-insensitive);
/// anything else that is set counts as off.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| TRUTHY_VALUES.contains(&s.trim().to_ascii_lowercase().as_str()))
        .unwrap_or(default)
}
