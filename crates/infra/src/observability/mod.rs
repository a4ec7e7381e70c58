//! Observability infrastructure
//!
//! - [`logging`]: subscriber initialisation and the `tracing`-backed
//!   [`Logger`](opscope_common::Logger)
//! - [`exporters`]: metrics sinks (statsd over UDP, the `metrics` facade)

pub mod exporters;
pub mod logging;

pub use exporters::{MetricsFacade, StatsdClient, StatsdError, StatsdPipeline};
pub use logging::TracingLogger;
