//! Trait abstractions for the log and metrics sinks
//!
//! The instrumentation core only ever talks to these traits. Transport,
//! formatting, batching and delivery failures belong to the implementations.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use super::ErrorReport;

// ============================================================================
// Logger
// ============================================================================

/// Structured logger capability
pub trait Logger: Send + Sync + Debug {
    /// Emit a debug-level message
    fn debug(&self, message: &str);

    /// Emit an error entry that carries the failure that caused it
    fn exception(&self, message: &str, error: &ErrorReport);
}

impl<T: Logger + ?Sized> Logger for Arc<T> {
    fn debug(&self, message: &str) {
        (**self).debug(message);
    }

    fn exception(&self, message: &str, error: &ErrorReport) {
        (**self).exception(message, error);
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Metrics aggregator capability addressed by dotted string keys
///
/// Methods return nothing: a sink that cannot deliver is expected to deal
/// with that itself.
pub trait MetricsClient: Send + Sync + Debug {
    /// Increment counter `key` by `amount`
    fn incr(&self, key: &str, amount: i64);

    /// Record one timing sample for `key`
    fn timing(&self, key: &str, duration: Duration);
}

impl<T: MetricsClient + ?Sized> MetricsClient for Arc<T> {
    fn incr(&self, key: &str, amount: i64) {
        (**self).incr(key, amount);
    }

    fn timing(&self, key: &str, duration: Duration) {
        (**self).timing(key, duration);
    }
}
