//! Observability capabilities consumed by the instrumentation core
//!
//! - [`Logger`]: leveled messages plus a distinct "exception" entry point
//! - [`MetricsClient`]: dotted-key counters and timers
//! - [`ErrorReport`]: owned snapshot of a failure, handed to loggers
//!
//! Both capabilities are shared read-only across threads, so implementations
//! must be `Send + Sync`.

pub mod report;
pub mod traits;

pub use report::ErrorReport;
pub use traits::{Logger, MetricsClient};
