//! Time abstraction for testability
//!
//! Elapsed durations reported by the instrumentation core are measured
//! through [`Clock`], so tests can drive them with [`MockClock`] instead of
//! sleeping.

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
