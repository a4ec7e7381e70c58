//! Integration tests for the recording doubles.
//!
//! Exercises them through the capability traits, the way the instrumentation
//! core sees them.

#![cfg(feature = "test-utils")]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use opscope_common::testing::{LogLevel, MetricCall, RecordingLogger, RecordingMetrics};
use opscope_common::{Clock, ErrorReport, Logger, MetricsClient, MockClock};

#[test]
fn test_recording_logger_through_trait_object() {
    let recorder = RecordingLogger::new();
    let logger: Arc<dyn Logger> = Arc::new(recorder.clone());

    logger.debug("svc.run.call,{}");
    logger.exception("svc.run.error,{}", &ErrorReport::capture("boom"));

    let records = recorder.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, LogLevel::Debug);
    assert_eq!(records[1].level, LogLevel::Exception);
    assert_eq!(recorder.keys(), vec!["svc.run.call", "svc.run.error"]);

    recorder.clear();
    assert!(recorder.records().is_empty());
}

#[test]
fn test_recording_metrics_shared_across_threads() {
    let recorder = RecordingMetrics::new();
    let metrics: Arc<dyn MetricsClient> = Arc::new(recorder.clone());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                for _ in 0..50 {
                    metrics.incr("svc.run.call.total", 1);
                }
                metrics.timing("svc.run.success.total", Duration::from_millis(3));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread");
    }

    assert_eq!(recorder.counter("svc.run.call.total"), 200);
    assert_eq!(recorder.timings("svc.run.success.total"), vec![Duration::from_millis(3); 4]);
    assert!(recorder.calls().contains(&MetricCall::incr("svc.run.call.total", 1)));
}

#[test]
fn test_anyhow_and_boxed_errors_capture() {
    let chained = anyhow::anyhow!("connection reset").context("flushing batch");
    let report = ErrorReport::capture(&chained);
    assert_eq!(report.message(), "flushing batch");
    assert!(report.detail().contains("connection reset"));

    let boxed: Box<dyn std::error::Error + Send + Sync> = "plain failure".into();
    let report = ErrorReport::capture(&boxed);
    assert_eq!(report.message(), "plain failure");
    assert!(!report.is_panic());
}

#[test]
fn test_mock_clock_clones_share_time() {
    let clock = MockClock::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let start = shared.now();

    clock.advance_millis(40);

    assert_eq!(shared.since(start), Duration::from_millis(40));
    assert_eq!(shared.since(start + Duration::from_secs(1)), Duration::ZERO);
}
