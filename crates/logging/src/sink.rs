//! crates/logging/src/sink.rs
//! Destination trait for emitted log lines.

use std::fmt;

use crate::levels::Level;

/// What went wrong inside a failed operation scope.
///
/// `message` is the error's `Display` text. `detail` is its `Debug` rendering,
/// which for most error types includes the variant and, for `anyhow`-style
/// errors, the cause chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    message: String,
    detail: String,
}

impl Failure {
    /// Creates a failure from already rendered parts.
    #[must_use]
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// Captures an error's display and debug renderings.
    #[must_use]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        Self::new(error.to_string(), format!("{error:?}"))
    }

    /// Failure recorded when a scope is dropped while its thread panics.
    #[must_use]
    pub fn panicked() -> Self {
        Self::new("operation panicked", "thread panicked while the operation scope was active")
    }

    /// The error's display text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error's debug rendering.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// One log line on its way to a [`Sink`].
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// Name of the emitting logger (`"root"` for the root logger).
    pub logger: &'a str,
    /// Severity of the line.
    pub level: Level,
    /// Rendered message text.
    pub message: &'a str,
    /// Failure observed by an operation scope, if any.
    pub failure: Option<&'a Failure>,
}

/// Receives every record that passed its logger's severity threshold.
///
/// Implementations are responsible for formatting and output; they must not
/// filter by severity again.
pub trait Sink: Send + Sync {
    /// Writes or forwards one record.
    fn emit(&self, record: &Record<'_>);
}

impl<S> Sink for std::sync::Arc<S>
where
    S: Sink + ?Sized,
{
    fn emit(&self, record: &Record<'_>) {
        (**self).emit(record);
    }
}
