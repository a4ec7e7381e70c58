//! Telemetry constants
//!
//! Environment variable names, their defaults, and naming conventions shared
//! by the instrumentation core and the infrastructure adapters.

// Naming
/// Label used for scoped-block instrumentation when no explicit label is set.
///
/// The string carries no meaning beyond "unlabeled block usage". Existing
/// dashboards group on it, so it must not change.
pub const DEFAULT_SCOPE_LABEL: &str = "context_manager";
/// Suffix appended to every event key before it is sent to the metrics sink.
pub const METRIC_TOTAL_SUFFIX: &str = "total";
/// Separator between key segments.
pub const KEY_SEPARATOR: char = '.';

// Logging
/// Log filter directive, e.g. `DEBUG` or `info,opscope_core=trace`.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// Output format: `pretty`, `compact` or `json`.
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
/// Level used when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "DEBUG";

// Statsd
/// Switches the statsd sink on when set to a truthy value.
pub const ENV_STATSD_ON: &str = "STATSD_ON";
/// Statsd host name or address.
pub const ENV_STATSD_HOST: &str = "STATSD_HOST";
/// Statsd UDP port.
pub const ENV_STATSD_PORT: &str = "STATSD_PORT";
/// Prefix prepended to every metric key.
pub const ENV_STATSD_PREFIX: &str = "STATSD_PREFIX";
/// Datagram size limit for pipelined metrics, in bytes.
pub const ENV_STATSD_MAXUDPSIZE: &str = "STATSD_MAXUDPSIZE";
/// Host used when `STATSD_HOST` is unset.
pub const DEFAULT_STATSD_HOST: &str = "localhost";
/// Port used when `STATSD_PORT` is unset.
pub const DEFAULT_STATSD_PORT: u16 = 8125;
/// Prefix used when `STATSD_PREFIX` is unset.
pub const DEFAULT_STATSD_PREFIX: &str = "dev.app";
/// Limit used when `STATSD_MAXUDPSIZE` is unset.
pub const DEFAULT_STATSD_MAXUDPSIZE: usize = 512;

/// Values accepted as "on" for `STATSD_ON` (compared case-insensitively).
pub const TRUTHY_VALUES: [&str; 3] = ["true", "ok", "yes"];
