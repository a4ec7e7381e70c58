//! # Opscope Domain
//!
//! Shared types for the opscope workspace.
//!
//! This crate contains:
//! - Telemetry configuration structures (logging + statsd)
//! - Environment variable names and their defaults
//! - The workspace error type and Result definition
//!
//! ## Architecture
//! - No dependencies on other opscope crates
//! - Only external dependencies allowed

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
