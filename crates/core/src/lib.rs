//! # Opscope Core
//!
//! Call/success/error instrumentation for units of work.
//!
//! An [`Instrumentation`] is bound to a namespace and reports three events
//! for every unit of work it observes:
//!
//! | Event | Log | Metrics (when attached) |
//! |---|---|---|
//! | `{namespace}.{label}.call` | debug | `incr(.., 1)` |
//! | `{namespace}.{label}.success` | debug, with elapsed | `incr(.., 1)`, `timing(..)` |
//! | `{namespace}.{label}.error` | exception | `incr(.., 1)` |
//!
//! Metric keys carry a trailing `.total`.
//!
//! Two usage modes sit on top of the reporting primitives:
//! - scoped blocks: [`Instrumentation::enter`] returns a [`ScopedRegion`]
//!   handle that owns its own start time, [`Instrumentation::scope`] and
//!   [`Instrumentation::scope_async`] wrap closures and futures
//! - decoration: [`Instrumentation::decorate`] / [`decorate!`] wrap a
//!   function so every invocation is reported under the function's name
//!
//! ## Architecture Principles
//! - Only depends on `opscope-common` and `opscope-domain`
//! - Sinks are injected as trait objects, nothing is read from globals
//! - Sink failures are never caught here

pub mod instrumentation;

pub use instrumentation::context::EventContext;
pub use instrumentation::decorate::{Decorated, Invoke};
pub use instrumentation::keys::{compose_key, metric_key, Phase};
pub use instrumentation::reporter::{Instrumentation, InstrumentationBuilder};
pub use instrumentation::scope::ScopedRegion;
pub use opscope_common::{ErrorReport, Logger, MetricsClient};
pub use opscope_domain::constants::DEFAULT_SCOPE_LABEL;
