//! Instrumentation wrapper
//!
//! - [`keys`]: event and metric key composition
//! - [`context`]: extra key/value context rendered into log lines
//! - [`reporter`]: the [`Instrumentation`](reporter::Instrumentation) type and
//!   its three reporting primitives
//! - [`scope`]: scoped-block usage
//! - [`decorate`]: function decoration usage

pub mod context;
pub mod decorate;
pub mod keys;
pub mod reporter;
pub mod scope;
