//! Function decoration usage
//!
//! [`Decorated`] wraps a function so every invocation reports `call`, then
//! `success` (with elapsed time) or `error`, under the function's name. The
//! start instant is a local of each invocation, so one decorated function can
//! be called concurrently.
//!
//! Arguments are passed as a tuple: `()` for no arguments, `(a,)` for one,
//! `(a, b)` for two, up to six.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;

use super::context::EventContext;
use super::reporter::Instrumentation;
use super::scope::{ScopedRegion, CANCELLED};

/// Calls a function with its arguments packed in a tuple
pub trait Invoke<Args> {
    /// Return type of the function
    type Output;

    /// Call with unpacked `args`
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg),*> Invoke<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);

/// A function wrapped by [`Instrumentation::decorate`].
///
/// Errors propagate by default; [`Decorated::reraise`] changes that for this
/// decoration only, independently of the instrumentation's own policy.
#[derive(Clone)]
pub struct Decorated<F> {
    instrumentation: Instrumentation,
    name: Arc<str>,
    reraise: bool,
    function: F,
}

impl Instrumentation {
    /// Wrap `function`, reporting its invocations under `name`.
    ///
    /// The [`decorate!`](crate::decorate!) macro fills `name` from the
    /// function's identifier.
    pub fn decorate<F>(&self, name: impl Into<String>, function: F) -> Decorated<F> {
        Decorated {
            instrumentation: self.clone(),
            name: name.into().into(),
            reraise: true,
            function,
        }
    }
}

impl<F> Decorated<F> {
    /// Error propagation policy for this decoration
    #[must_use]
    pub fn reraise(mut self, reraise: bool) -> Self {
        self.reraise = reraise;
        self
    }

    /// Label the invocations are reported under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether errors are handed back to the caller
    pub fn reraises(&self) -> bool {
        self.reraise
    }

    /// Invoke the wrapped function.
    ///
    /// Returns `Ok(Some(value))` on success. An `Err` is reported and then
    /// handed back unchanged, or swallowed as `Ok(None)` when this
    /// decoration does not re-raise. A panic is reported and resumed.
    pub fn call<Args, T, E>(&self, args: Args) -> Result<Option<T>, E>
    where
        F: Invoke<Args, Output = Result<T, E>>,
        E: fmt::Display + fmt::Debug,
    {
        let region = self.enter();
        match panic::catch_unwind(AssertUnwindSafe(|| self.function.invoke(args))) {
            Ok(outcome) => region.exit(outcome),
            Err(payload) => region.unwind(payload),
        }
    }

    /// Invoke a wrapped async function; same reporting as [`Decorated::call`].
    ///
    /// Dropping the returned future before it completes reports an `error`.
    pub async fn call_async<Args, Fut, T, E>(&self, args: Args) -> Result<Option<T>, E>
    where
        F: Invoke<Args, Output = Fut>,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display + fmt::Debug,
    {
        let region = self.enter().abandoned_as(CANCELLED);

        let work = match panic::catch_unwind(AssertUnwindSafe(|| self.function.invoke(args))) {
            Ok(work) => work,
            Err(payload) => region.unwind(payload),
        };

        match AssertUnwindSafe(work).catch_unwind().await {
            Ok(outcome) => region.exit(outcome),
            Err(payload) => region.unwind(payload),
        }
    }

    fn enter(&self) -> ScopedRegion<'_> {
        self.instrumentation.open_region(&self.name, self.reraise, EventContext::new())
    }
}

impl<F> fmt::Debug for Decorated<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorated")
            .field("name", &self.name)
            .field("reraise", &self.reraise)
            .field("namespace", &self.instrumentation.namespace())
            .finish_non_exhaustive()
    }
}

/// Decorate a function, using its identifier as the label.
///
/// ```
/// use std::sync::Arc;
///
/// use opscope_common::testing::RecordingLogger;
/// use opscope_core::{decorate, Instrumentation};
///
/// fn compute(x: u32) -> Result<u32, String> {
///     Ok(x * 2)
/// }
///
/// let logger = RecordingLogger::new();
/// let instrumentation = Instrumentation::builder("math", Arc::new(logger.clone())).build();
///
/// let compute = decorate!(instrumentation, compute);
/// assert_eq!(compute.call((21,)), Ok(Some(42)));
/// assert_eq!(logger.keys(), vec!["math.compute.call", "math.compute.success"]);
///
/// let lenient = decorate!(instrumentation, compute, reraise = false);
/// assert!(!lenient.reraises());
/// ```
#[macro_export]
macro_rules! decorate {
    ($instrumentation:expr, $function:ident) => {
        $instrumentation.decorate(stringify!($function), $function)
    };
    ($instrumentation:expr, $function:ident, reraise = $reraise:expr) => {
        $instrumentation.decorate(stringify!($function), $function).reraise($reraise)
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use opscope_common::testing::{MetricCall, RecordingLogger, RecordingMetrics};
    use opscope_common::{Clock, ErrorReport, MockClock};

    use super::*;

    #[derive(Debug, PartialEq, Eq, thiserror::Error)]
    #[error("bad input: {0}")]
    struct ValueError(String);

    fn setup() -> (Instrumentation, RecordingLogger, RecordingMetrics, MockClock) {
        let logger = RecordingLogger::new();
        let metrics = RecordingMetrics::new();
        let clock = MockClock::new();
        let instrumentation = Instrumentation::builder("svc", Arc::new(logger.clone()))
            .metrics(Arc::new(metrics.clone()))
            .clock(Arc::new(clock.clone()))
            .reraise(false)
            .build();
        (instrumentation, logger, metrics, clock)
    }

    fn compute() -> Result<u32, ValueError> {
        Err(ValueError("negative".to_string()))
    }

    #[test]
    fn test_success_returns_value_and_times_call() {
        let (instrumentation, logger, metrics, clock) = setup();
        let ticking = clock.clone();
        let add = instrumentation.decorate("add", move |a: u32, b: u32| {
            ticking.advance_millis(7);
            Ok::<_, ValueError>(a + b)
        });

        assert_eq!(add.call((2, 3)), Ok(Some(5)));
        assert_eq!(logger.keys(), vec!["svc.add.call", "svc.add.success"]);
        assert_eq!(
            metrics.calls(),
            vec![
                MetricCall::incr("svc.add.call.total", 1),
                MetricCall::incr("svc.add.success.total", 1),
                MetricCall::timing("svc.add.success.total", Duration::from_millis(7)),
            ]
        );
        assert_eq!(clock.elapsed(), Duration::from_millis(7));
    }

    #[test]
    fn test_default_policy_reraises_regardless_of_instrumentation() {
        let (instrumentation, logger, metrics, _) = setup();
        assert!(!instrumentation.reraise());

        let decorated = decorate!(instrumentation, compute);
        assert_eq!(decorated.name(), "compute");

        let result = decorated.call(());

        assert_eq!(result, Err(ValueError("negative".to_string())));
        assert_eq!(logger.keys(), vec!["svc.compute.call", "svc.compute.error"]);
        assert_eq!(metrics.counter("svc.compute.error.total"), 1);
        assert_eq!(metrics.counter("svc.compute.success.total"), 0);
    }

    #[test]
    fn test_reraise_override_swallows() {
        let (instrumentation, logger, _, _) = setup();
        let decorated = decorate!(instrumentation, compute, reraise = false);

        assert_eq!(decorated.call(()), Ok(None));
        let exceptions = logger.exceptions();
        assert_eq!(exceptions.len(), 1);
        assert_eq!(
            exceptions[0].error.as_ref().map(ErrorReport::message),
            Some("bad input: negative")
        );
    }

    #[test]
    fn test_same_instrumentation_mixed_policies() {
        let (instrumentation, _, metrics, _) = setup();
        let strict = instrumentation.decorate("strict", || Err::<(), _>("no"));
        let lenient = instrumentation.decorate("lenient", || Err::<(), _>("no")).reraise(false);

        assert_eq!(strict.call(()), Err("no"));
        assert_eq!(lenient.call(()), Ok(None));
        assert_eq!(metrics.counter("svc.strict.error.total"), 1);
        assert_eq!(metrics.counter("svc.lenient.error.total"), 1);
    }

    #[test]
    fn test_panic_is_reported_and_resumed() {
        let (instrumentation, logger, _, _) = setup();
        let decorated = instrumentation
            .decorate("explode", || -> Result<(), ValueError> { panic!("kaboom") })
            .reraise(false);

        let caught = panic::catch_unwind(AssertUnwindSafe(|| decorated.call(())));

        assert!(caught.is_err());
        let exceptions = logger.exceptions();
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].error.as_ref().map(ErrorReport::message), Some("kaboom"));
    }

    #[test]
    fn test_elapsed_is_non_negative_with_system_clock() {
        let metrics = RecordingMetrics::new();
        let instrumentation = Instrumentation::builder("svc", Arc::new(RecordingLogger::new()))
            .metrics(Arc::new(metrics.clone()))
            .build();
        let sleepy = instrumentation.decorate("sleepy", || {
            std::thread::sleep(Duration::from_millis(2));
            Ok::<_, ValueError>(())
        });

        let before = opscope_common::SystemClock.now();
        sleepy.call(()).unwrap();
        let bound = opscope_common::SystemClock.since(before);

        let samples = metrics.timings("svc.sleepy.success.total");
        assert_eq!(samples.len(), 1);
        assert!(samples[0] >= Duration::from_millis(2));
        assert!(samples[0] <= bound);
    }

    #[tokio::test]
    async fn test_call_async() {
        let (instrumentation, logger, metrics, _) = setup();
        let fetch = instrumentation.decorate("fetch", |id: u64| async move {
            if id == 0 {
                Err(ValueError("zero".to_string()))
            } else {
                Ok(id * 10)
            }
        });

        assert_eq!(fetch.call_async((4,)).await, Ok(Some(40)));
        assert!(fetch.call_async((0,)).await.is_err());
        assert_eq!(metrics.counter("svc.fetch.call.total"), 2);
        assert_eq!(
            logger.keys(),
            vec!["svc.fetch.call", "svc.fetch.success", "svc.fetch.call", "svc.fetch.error"]
        );
    }

    #[test]
    fn test_call_async_dropped_before_completion_reports_error() {
        let (instrumentation, logger, metrics, _) = setup();
        let stalled = instrumentation
            .decorate("stalled", || futures::future::pending::<Result<(), ValueError>>());

        assert!(stalled.call_async(()).now_or_never().is_none());

        assert_eq!(logger.keys(), vec!["svc.stalled.call", "svc.stalled.error"]);
        assert_eq!(metrics.counter("svc.stalled.success.total"), 0);
        let report = logger.exceptions()[0].error.clone().unwrap();
        assert!(report.is_abandoned());
    }

    #[test]
    fn test_debug_omits_function() {
        let (instrumentation, _, _, _) = setup();
        let decorated = instrumentation.decorate("noop", || Ok::<_, ValueError>(()));
        let rendered = format!("{decorated:?}");
        assert!(rendered.contains("\"noop\""));
        assert!(rendered.contains("svc"));
    }
}
