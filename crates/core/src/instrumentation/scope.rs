//! Scoped-block usage
//!
//! A region is `Active` from [`Instrumentation::enter`] until it is closed by
//! [`ScopedRegion::exit`] (or one of its shorthands) or dropped. Closing
//! reports exactly one outcome event. The start instant lives in the handle,
//! so overlapping regions on one [`Instrumentation`] never disturb each
//! other's timing.
//!
//! Only an explicit `Ok` outcome counts as success. A region that is dropped
//! while still active, whether by an early `?` return, a panic or a
//! cancelled future, reports an `error`.

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use futures::FutureExt;
use opscope_common::ErrorReport;

use super::context::EventContext;
use super::reporter::Instrumentation;

const DROPPED_ACTIVE: &str = "scoped region dropped before it was closed";
pub(crate) const CANCELLED: &str = "cancelled before completion";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionState {
    Active(Instant),
    Closed,
}

/// Handle for one in-flight scoped block.
///
/// Dropping an active region closes it as an error: with the panic payload
/// if the thread is unwinding, as abandoned otherwise.
#[derive(Debug)]
#[must_use = "dropping a region immediately reports it as abandoned"]
pub struct ScopedRegion<'a> {
    instrumentation: &'a Instrumentation,
    label: &'a str,
    reraise: bool,
    context: EventContext,
    state: RegionState,
    abandon_reason: &'static str,
}

impl Instrumentation {
    /// Open a scoped region under [`Instrumentation::scope_label`].
    ///
    /// Reports the `call` event, then starts the clock.
    pub fn enter(&self) -> ScopedRegion<'_> {
        self.enter_with(EventContext::new())
    }

    /// Same as [`Instrumentation::enter`], with extra context that is
    /// attached to every event of the region.
    pub fn enter_with(&self, context: EventContext) -> ScopedRegion<'_> {
        self.open_region(self.scope_label(), self.reraise(), context)
    }

    pub(crate) fn open_region<'a>(
        &'a self,
        label: &'a str,
        reraise: bool,
        context: EventContext,
    ) -> ScopedRegion<'a> {
        self.report_call(label, &context);
        let start = self.clock().now();
        ScopedRegion {
            instrumentation: self,
            label,
            reraise,
            context,
            state: RegionState::Active(start),
            abandon_reason: DROPPED_ACTIVE,
        }
    }

    /// Run `work` inside a scoped region.
    ///
    /// Returns `Ok(Some(value))` on success. On `Err` the error is reported
    /// and then either handed back unchanged (`reraise`) or swallowed as
    /// `Ok(None)`. A panic in `work` is reported and then resumed.
    pub fn scope<T, E, F>(&self, work: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display + fmt::Debug,
    {
        let region = self.enter();
        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(outcome) => region.exit(outcome),
            Err(payload) => region.unwind(payload),
        }
    }

    /// Async counterpart of [`Instrumentation::scope`].
    ///
    /// If the returned future is dropped before `work` completes, the region
    /// reports an `error` for the cancellation.
    pub async fn scope_async<T, E, Fut>(&self, work: Fut) -> Result<Option<T>, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + fmt::Debug,
    {
        let region = self.enter().abandoned_as(CANCELLED);
        match AssertUnwindSafe(work).catch_unwind().await {
            Ok(outcome) => region.exit(outcome),
            Err(payload) => region.unwind(payload),
        }
    }
}

impl ScopedRegion<'_> {
    /// Label this region reports under
    pub fn label(&self) -> &str {
        self.label
    }

    /// Context attached to this region's events
    pub fn context(&self) -> &EventContext {
        &self.context
    }

    /// Time since the region was entered
    pub fn elapsed(&self) -> Duration {
        match self.state {
            RegionState::Active(start) => self.instrumentation.clock().since(start),
            RegionState::Closed => Duration::ZERO,
        }
    }

    pub(crate) fn abandoned_as(mut self, reason: &'static str) -> Self {
        self.abandon_reason = reason;
        self
    }

    /// Close the region with the block's outcome.
    ///
    /// See [`Instrumentation::scope`] for the meaning of the return value.
    pub fn exit<T, E>(mut self, outcome: Result<T, E>) -> Result<Option<T>, E>
    where
        E: fmt::Display + fmt::Debug,
    {
        match outcome {
            Ok(value) => {
                self.close_success();
                Ok(Some(value))
            }
            Err(error) => {
                self.close_error(&ErrorReport::capture(&error));
                if self.reraise {
                    Err(error)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Close the region as a success.
    pub fn finish(self) {
        let _ = self.exit(Ok::<(), Infallible>(()));
    }

    /// Close the region as a failure.
    ///
    /// Returns the error back when the instrumentation re-raises.
    pub fn fail<E>(self, error: E) -> Result<(), E>
    where
        E: fmt::Display + fmt::Debug,
    {
        self.exit(Err(error)).map(|_: Option<()>| ())
    }

    pub(crate) fn unwind(mut self, payload: Box<dyn Any + Send>) -> ! {
        self.close_error(&ErrorReport::from_panic(payload.as_ref()));
        panic::resume_unwind(payload)
    }

    fn close_success(&mut self) {
        let elapsed = match self.state {
            RegionState::Active(start) => Some(self.instrumentation.clock().since(start)),
            RegionState::Closed => None,
        };
        self.state = RegionState::Closed;
        self.instrumentation.report_success(self.label, &self.context, elapsed);
    }

    fn close_error(&mut self, report: &ErrorReport) {
        self.state = RegionState::Closed;
        self.instrumentation.report_error(self.label, report, &self.context);
    }
}

impl Drop for ScopedRegion<'_> {
    fn drop(&mut self) {
        if self.state == RegionState::Closed {
            return;
        }

        let report = if std::thread::panicking() {
            ErrorReport::from_panic(&"panicked while scoped region was active")
        } else {
            ErrorReport::abandoned(self.abandon_reason)
        };
        self.close_error(&report);
    }
}
