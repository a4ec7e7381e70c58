//! The instrumentation wrapper and its reporting primitives

use std::sync::Arc;
use std::time::Duration;

use opscope_common::{Clock, ErrorReport, Logger, MetricsClient, SystemClock};
use opscope_domain::constants::DEFAULT_SCOPE_LABEL;

use super::context::EventContext;
use super::keys::{compose_key, metric_key, Phase};

/// Operation reporter bound to one namespace.
///
/// Holds shared references to the sinks and immutable naming/policy
/// settings only. Timing state lives in [`ScopedRegion`](super::scope::ScopedRegion)
/// handles and in per-call locals of [`Decorated`](super::decorate::Decorated),
/// so a single instance can be used from many threads at once.
///
/// Cloning is cheap: every field is shared.
#[derive(Debug, Clone)]
pub struct Instrumentation {
    logger: Arc<dyn Logger>,
    metrics: Option<Arc<dyn MetricsClient>>,
    namespace: Arc<str>,
    label: Option<Arc<str>>,
    reraise: bool,
    clock: Arc<dyn Clock>,
}

impl Instrumentation {
    /// Start building an instrumentation for `namespace` that logs to `logger`.
    ///
    /// Defaults: no metrics, no explicit label, errors propagate, system clock.
    pub fn builder(namespace: impl Into<String>, logger: Arc<dyn Logger>) -> InstrumentationBuilder {
        InstrumentationBuilder {
            namespace: namespace.into(),
            logger,
            metrics: None,
            label: None,
            reraise: true,
            clock: Arc::new(SystemClock),
        }
    }

    /// Dotted prefix of every key produced by this instance
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Explicit label for scoped-block usage, if one was set
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label used by scoped-block usage: the explicit label or
    /// [`DEFAULT_SCOPE_LABEL`]
    pub fn scope_label(&self) -> &str {
        self.label.as_deref().unwrap_or(DEFAULT_SCOPE_LABEL)
    }

    /// Whether scoped-block usage hands errors back to the caller
    pub fn reraise(&self) -> bool {
        self.reraise
    }

    /// Whether a metrics sink is attached
    pub fn has_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Report that `label` is about to run.
    pub fn report_call(&self, label: &str, context: &EventContext) {
        let key = compose_key(&self.namespace, label, Phase::Call);

        if let Some(metrics) = &self.metrics {
            metrics.incr(&metric_key(&key), 1);
        }
        self.logger.debug(&format!("{key},{context}"));
    }

    /// Report that `label` finished normally, optionally after `elapsed`.
    ///
    /// The timing sample is only recorded when `elapsed` is known; the log
    /// line shows it as a human readable duration.
    pub fn report_success(&self, label: &str, context: &EventContext, elapsed: Option<Duration>) {
        let key = compose_key(&self.namespace, label, Phase::Success);

        if let Some(metrics) = &self.metrics {
            let total = metric_key(&key);
            metrics.incr(&total, 1);
            if let Some(elapsed) = elapsed {
                metrics.timing(&total, elapsed);
            }
        }

        match elapsed {
            Some(elapsed) => {
                let context = context.clone().with("elapsed", format!("{elapsed:?}"));
                self.logger.debug(&format!("{key},{context}"));
            }
            None => self.logger.debug(&format!("{key},{context}")),
        }
    }

    /// Report that `label` failed with `error`.
    pub fn report_error(&self, label: &str, error: &ErrorReport, context: &EventContext) {
        let key = compose_key(&self.namespace, label, Phase::Error);

        if let Some(metrics) = &self.metrics {
            metrics.incr(&metric_key(&key), 1);
        }
        self.logger.exception(&format!("{key},{context}"), error);
    }
}

/// Builder for [`Instrumentation`]; construction never fails
#[derive(Debug, Clone)]
#[must_use]
pub struct InstrumentationBuilder {
    namespace: String,
    logger: Arc<dyn Logger>,
    metrics: Option<Arc<dyn MetricsClient>>,
    label: Option<String>,
    reraise: bool,
    clock: Arc<dyn Clock>,
}

impl InstrumentationBuilder {
    /// Replace the logger
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Attach a metrics sink
    pub fn metrics(mut self, metrics: Arc<dyn MetricsClient>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attach a metrics sink if one is available
    pub fn maybe_metrics(mut self, metrics: Option<Arc<dyn MetricsClient>>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Detach any metrics sink
    pub fn without_metrics(mut self) -> Self {
        self.metrics = None;
        self
    }

    /// Explicit label for scoped-block usage
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Error propagation policy for scoped-block usage
    pub fn reraise(mut self, reraise: bool) -> Self {
        self.reraise = reraise;
        self
    }

    /// Clock used to measure elapsed time
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Finish the builder
    pub fn build(self) -> Instrumentation {
        Instrumentation {
            logger: self.logger,
            metrics: self.metrics,
            namespace: self.namespace.into(),
            label: self.label.map(Into::into),
            reraise: self.reraise,
            clock: self.clock,
        }
    }
}
