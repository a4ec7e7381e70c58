//! Event and metric key composition
//!
//! Every event key has exactly three segments: `namespace.label.phase`.
//! The metric key appends the reserved `total` segment.

use opscope_domain::constants::{KEY_SEPARATOR, METRIC_TOTAL_SUFFIX};
use opscope_domain::impl_str_enum_conversions;

/// Lifecycle phase of one observed unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Work is about to start
    Call,
    /// Work returned normally
    Success,
    /// Work failed
    Error,
}

impl_str_enum_conversions!(Phase {
    Call => "call",
    Success => "success",
    Error => "error",
});

/// `"{namespace}.{label}.{phase}"`
pub fn compose_key(namespace: &str, label: &str, phase: Phase) -> String {
    let phase = phase.as_str();
    let mut key = String::with_capacity(namespace.len() + label.len() + phase.len() + 2);
    key.push_str(namespace);
    key.push(KEY_SEPARATOR);
    key.push_str(label);
    key.push(KEY_SEPARATOR);
    key.push_str(phase);
    key
}

/// `"{event_key}.total"`
pub fn metric_key(event_key: &str) -> String {
    format!("{event_key}{KEY_SEPARATOR}{METRIC_TOTAL_SUFFIX}")
}
