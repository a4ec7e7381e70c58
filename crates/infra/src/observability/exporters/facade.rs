//! Bridge to the `metrics` crate facade
//!
//! Lets the instrumentation report into whatever recorder the application
//! installed (Prometheus exporter, etc.). Counters map to `counter!`, timings
//! to `histogram!` in seconds.

use std::time::Duration;

use opscope_common::MetricsClient;

/// [`MetricsClient`] that forwards to the globally installed `metrics`
/// recorder. Without a recorder every call is a no-op.
#[derive(Debug, Clone, Default)]
pub struct MetricsFacade {
    prefix: Option<String>,
}

impl MetricsFacade {
    /// Facade that forwards keys unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Facade that prepends `prefix.` to every key
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self { prefix: (!prefix.is_empty()).then_some(prefix) }
    }

    fn metric_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.to_string(),
        }
    }
}

impl MetricsClient for MetricsFacade {
    fn incr(&self, key: &str, amount: i64) {
        match u64::try_from(amount) {
            Ok(value) => metrics::counter!(self.metric_name(key)).increment(value),
            Err(_) => tracing::warn!(metric = key, amount, "Dropped negative counter increment"),
        }
    }

    fn timing(&self, key: &str, duration: Duration) {
        metrics::histogram!(self.metric_name(key)).record(duration.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metrics::{
        Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
        SharedString, Unit,
    };
    use parking_lot::Mutex;

    use super::*;

    #[derive(Debug, Default, Clone)]
    struct CapturingRecorder {
        counters: Arc<Mutex<Vec<(String, u64)>>>,
        histograms: Arc<Mutex<Vec<(String, f64)>>>,
    }

    struct Handle {
        name: String,
        store: CapturingRecorder,
    }

    impl CounterFn for Handle {
        fn increment(&self, value: u64) {
            self.store.counters.lock().push((self.name.clone(), value));
        }

        fn absolute(&self, _value: u64) {}
    }

    impl HistogramFn for Handle {
        fn record(&self, value: f64) {
            self.store.histograms.lock().push((self.name.clone(), value));
        }
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            Counter::from_arc(Arc::new(Handle { name: key.name().to_string(), store: self.clone() }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::from_arc(Arc::new(Handle { name: key.name().to_string(), store: self.clone() }))
        }
    }

    #[test]
    fn test_forwards_counter_and_histogram() {
        let recorder = CapturingRecorder::default();
        let facade = MetricsFacade::with_prefix("dev.app");

        metrics::with_local_recorder(&recorder, || {
            facade.incr("jobs.run.call.total", 2);
            facade.timing("jobs.run.success.total", Duration::from_millis(250));
        });

        assert_eq!(*recorder.counters.lock(), vec![("dev.app.jobs.run.call.total".to_string(), 2)]);
        assert_eq!(
            *recorder.histograms.lock(),
            vec![("dev.app.jobs.run.success.total".to_string(), 0.25)]
        );
    }

    #[test]
    fn test_negative_increment_is_dropped() {
        let recorder = CapturingRecorder::default();
        let facade = MetricsFacade::new();

        metrics::with_local_recorder(&recorder, || facade.incr("k", -1));

        assert!(recorder.counters.lock().is_empty());
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        assert_eq!(MetricsFacade::with_prefix("").metric_name("k"), "k");
        assert_eq!(MetricsFacade::new().metric_name("a.b"), "a.b");
    }

    #[test]
    fn test_no_recorder_is_noop() {
        MetricsFacade::new().incr("unrecorded", 1);
        MetricsFacade::new().timing("unrecorded", Duration::ZERO);
    }
}
