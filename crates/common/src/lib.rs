//! Capability seams shared across opscope crates.
//!
//! # Modules
//! - `observability`: the logger and metrics capabilities the instrumentation
//!   core reports into, plus the [`ErrorReport`] snapshot handed to loggers
//! - `time`: monotonic clock abstraction (real and mock)
//! - `testing`: recording doubles (enable the `test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod observability;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use observability::{ErrorReport, Logger, MetricsClient};
pub use time::{Clock, MockClock, SystemClock};
