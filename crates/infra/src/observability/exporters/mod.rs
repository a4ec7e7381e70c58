//! Metrics exporters
//!
//! [`MetricsClient`](opscope_common::MetricsClient) implementations that send
//! to external monitoring systems.

pub mod facade;
pub mod statsd;

// Re-export exporter types for convenience
pub use facade::MetricsFacade;
pub use statsd::{StatsdClient, StatsdError, StatsdPipeline};
