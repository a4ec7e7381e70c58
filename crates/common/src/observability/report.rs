//! Owned snapshot of a work-unit failure

use std::any::Any;
use std::fmt;

/// What a logger receives alongside an exception-level message.
///
/// Captured from any `Display + Debug` value so that `std` errors, boxed
/// errors and `anyhow::Error` all work. `detail` is the `{:?}` rendering,
/// which for `anyhow` includes the cause chain and, when enabled, the
/// backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    type_name: &'static str,
    message: String,
    detail: String,
}

impl ErrorReport {
    /// Type name reported for panics.
    pub const PANIC_TYPE: &'static str = "panic";
    /// Type name reported for work that ended without producing an outcome.
    pub const ABANDONED_TYPE: &'static str = "abandoned";

    /// Snapshot an error value without taking ownership of it.
    pub fn capture<E>(error: &E) -> Self
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        Self {
            type_name: std::any::type_name::<E>(),
            message: error.to_string(),
            detail: format!("{error:?}"),
        }
    }

    /// Snapshot a panic payload as produced by `catch_unwind`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self { type_name: Self::PANIC_TYPE, detail: format!("panicked: {message}"), message }
    }

    /// Report for work that was left without an outcome, e.g. a region
    /// dropped by an early return or a future dropped before completion.
    pub fn abandoned(reason: &str) -> Self {
        Self {
            type_name: Self::ABANDONED_TYPE,
            message: reason.to_string(),
            detail: format!("abandoned: {reason}"),
        }
    }

    /// Fully qualified type name of the captured error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this report stands for work that never produced an outcome.
    pub fn is_abandoned(&self) -> bool {
        self.type_name == Self::ABANDONED_TYPE
    }

    /// `Display` rendering of the error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `Debug` rendering of the error.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Whether this report came from a panic rather than an `Err`.
    pub fn is_panic(&self) -> bool {
        self.type_name == Self::PANIC_TYPE
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}
