//! Testing utilities and helpers
//!
//! - **[`mocks`]**: recording implementations of [`Logger`](crate::Logger)
//!   and [`MetricsClient`](crate::MetricsClient)
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use opscope_common::testing::{MetricCall, RecordingMetrics};
//! use opscope_common::MetricsClient;
//!
//! let metrics = RecordingMetrics::new();
//! metrics.incr("jobs.export.run.call.total", 1);
//! assert_eq!(metrics.calls(), vec![MetricCall::incr("jobs.export.run.call.total", 1)]);
//! # }
//! ```

pub mod mocks;

pub use mocks::{LogLevel, LogRecord, MetricCall, RecordingLogger, RecordingMetrics};
