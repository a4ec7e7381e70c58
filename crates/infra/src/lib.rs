//! # Opscope Infrastructure
//!
//! Concrete sinks and startup plumbing for the instrumentation core.
//!
//! This crate contains:
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - Logging initialisation and the `tracing`-backed logger
//! - Metrics exporters (statsd over UDP, the `metrics` facade)
//! - [`TelemetryFactory`], which wires the above into instrumentations
//!
//! ## Architecture
//! - Implements the capability traits defined in `opscope-common`
//! - Depends on `opscope-domain`, `opscope-common` and `opscope-core`
//! - Contains all "impure" code (sockets, global subscriber, env)

pub mod config;
pub mod factory;
pub mod observability;

// Re-export commonly used items
pub use factory::TelemetryFactory;
pub use observability::logging;
pub use observability::{MetricsFacade, StatsdClient, StatsdError, StatsdPipeline, TracingLogger};
