//! Recording implementations of the observability capabilities
//!
//! Both doubles are cheap to clone and share their storage, so a test can
//! hand one clone to the code under test and assert on another.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::observability::{ErrorReport, Logger, MetricsClient};

/// Level of a captured log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// `Logger::debug`
    Debug,
    /// `Logger::exception`
    Exception,
}

/// One captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Which logger method produced the entry
    pub level: LogLevel,
    /// Message as passed by the caller
    pub message: String,
    /// Attached failure, only for [`LogLevel::Exception`]
    pub error: Option<ErrorReport>,
}

impl LogRecord {
    /// Event key part of an instrumentation message (`"{key},{context}"`).
    pub fn key(&self) -> &str {
        self.message.split_once(',').map_or(self.message.as_str(), |(key, _)| key)
    }
}

/// Logger that keeps every entry in memory
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-utils")]
/// # {
/// use opscope_common::testing::{LogLevel, RecordingLogger};
/// use opscope_common::Logger;
///
/// let logger = RecordingLogger::new();
/// logger.debug("orders.create.submit.call,{}");
///
/// let records = logger.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].level, LogLevel::Debug);
/// assert_eq!(records[0].key(), "orders.create.submit.call");
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingLogger {
    /// Create an empty recording logger
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Event keys of all captured entries, oldest first
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.records.lock().iter().map(|record| record.key().to_string()).collect()
    }

    /// Captured exception entries only
    #[must_use]
    pub fn exceptions(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.level == LogLevel::Exception)
            .cloned()
            .collect()
    }

    /// Drop all captured entries
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.records.lock().push(LogRecord {
            level: LogLevel::Debug,
            message: message.to_string(),
            error: None,
        });
    }

    fn exception(&self, message: &str, error: &ErrorReport) {
        self.records.lock().push(LogRecord {
            level: LogLevel::Exception,
            message: message.to_string(),
            error: Some(error.clone()),
        });
    }
}

/// One captured metrics call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricCall {
    /// `MetricsClient::incr`
    Incr {
        /// Metric key
        key: String,
        /// Increment
        amount: i64,
    },
    /// `MetricsClient::timing`
    Timing {
        /// Metric key
        key: String,
        /// Recorded sample
        duration: Duration,
    },
}

impl MetricCall {
    /// Shorthand for building an expected [`MetricCall::Incr`]
    pub fn incr(key: impl Into<String>, amount: i64) -> Self {
        Self::Incr { key: key.into(), amount }
    }

    /// Shorthand for building an expected [`MetricCall::Timing`]
    pub fn timing(key: impl Into<String>, duration: Duration) -> Self {
        Self::Timing { key: key.into(), duration }
    }

    /// Key the call was addressed to
    pub fn key(&self) -> &str {
        match self {
            Self::Incr { key, .. } | Self::Timing { key, .. } => key,
        }
    }
}

/// Metrics client that keeps every call in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingMetrics {
    calls: Arc<Mutex<Vec<MetricCall>>>,
}

impl RecordingMetrics {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured calls, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<MetricCall> {
        self.calls.lock().clone()
    }

    /// Sum of all increments addressed to `key`
    #[must_use]
    pub fn counter(&self, key: &str) -> i64 {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                MetricCall::Incr { key: k, amount } if k == key => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Timing samples addressed to `key`
    #[must_use]
    pub fn timings(&self, key: &str) -> Vec<Duration> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                MetricCall::Timing { key: k, duration } if k == key => Some(*duration),
                _ => None,
            })
            .collect()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

impl MetricsClient for RecordingMetrics {
    fn incr(&self, key: &str, amount: i64) {
        self.calls.lock().push(MetricCall::incr(key, amount));
    }

    fn timing(&self, key: &str, duration: Duration) {
        self.calls.lock().push(MetricCall::timing(key, duration));
    }
}
