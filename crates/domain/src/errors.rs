//! Error types used throughout the workspace
//!
//! The instrumentation core never produces errors of its own; these variants
//! cover startup plumbing (configuration, logging setup, sink construction).

use thiserror::Error;

/// Main error type for opscope
#[derive(Error, Debug)]
pub enum OpscopeError {
    /// A configuration source is missing, malformed or holds a bad value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be set up
    #[error("Logging error: {0}")]
    Logging(String),

    /// A metrics sink could not be created
    #[error("Metrics sink error: {0}")]
    Metrics(String),
}

/// Result type alias for opscope operations
pub type Result<T> = std::result::Result<T, OpscopeError>;
