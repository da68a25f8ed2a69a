//! crates/logging/src/logger.rs
//! Named logger handle.

use std::fmt;
use std::sync::Arc;

use crate::context::OperationContext;
use crate::instrument::Instrumented;
use crate::levels::Level;
use crate::registry::{ROOT_NAME, Registry};
use crate::sink::{Failure, Record};
use crate::verb::EmptyMessage;

/// Cheap, cloneable handle to one logger of a [`Registry`].
///
/// Besides the plain per-severity methods, a logger builds operation
/// contexts that log the start, completion or failure of a unit of work.
///
/// ```
/// use logging::{Level, Registry, drain_records};
///
/// let registry = Registry::with_capture();
/// registry.set_root_level(Level::Debug);
/// let logger = registry.logger("app");
///
/// let total = logger.info_context("Sum the numbers").run(|| {
///     Ok::<_, std::num::ParseIntError>("2".parse::<u32>()? + 3)
/// })?;
/// assert_eq!(total, 5);
///
/// let lines: Vec<_> = drain_records().into_iter().map(|r| r.message).collect();
/// assert_eq!(lines, ["Suming the numbers.", "The numbers sumed."]);
/// # Ok::<(), std::num::ParseIntError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    registry: Registry,
    key: Arc<str>,
}

impl Logger {
    pub(crate) fn new(registry: Registry, name: &str) -> Self {
        Self {
            registry,
            key: Arc::from(name),
        }
    }

    /// The logger's dotted name, `"root"` for the root logger.
    #[must_use]
    pub fn name(&self) -> &str {
        if self.is_root() { ROOT_NAME } else { &*self.key }
    }

    /// Whether this handle refers to the root logger.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }

    /// The registry this logger belongs to.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle to `name.suffix`, or to `suffix` when called on the root logger.
    #[must_use]
    pub fn child(&self, suffix: &str) -> Self {
        if self.is_root() {
            Self::new(self.registry.clone(), suffix)
        } else {
            Self::new(self.registry.clone(), &format!("{}.{suffix}", self.key))
        }
    }

    /// The severity set directly on this logger.
    #[must_use]
    pub fn level(&self) -> Level {
        self.registry.level(&self.key)
    }

    /// Sets this logger's own severity.
    pub fn set_level(&self, level: Level) {
        self.registry.set_level(&self.key, level);
    }

    /// The severity applied after inheritance.
    #[must_use]
    pub fn effective_level(&self) -> Level {
        self.registry.effective_level(&self.key)
    }

    /// Whether a record at `level` would be emitted.
    #[must_use]
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    /// Emits `message` at `level` when the logger is enabled for it.
    pub fn log(&self, level: Level, message: &str) {
        self.emit(level, message, None);
    }

    /// Emits at [`Level::Debug`].
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Emits at [`Level::Info`].
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Emits at [`Level::Warning`].
    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    /// Emits at [`Level::Error`].
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Emits at [`Level::Critical`].
    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }

    pub(crate) fn emit(&self, level: Level, message: &str, failure: Option<&Failure>) {
        if !self.is_enabled_for(level) {
            return;
        }
        self.registry.emit(&Record {
            logger: self.name(),
            level,
            message,
            failure,
        });
    }

    /// Builds an operation context, rejecting an empty message.
    ///
    /// `level` is the completion severity, [`Level::Info`] when `None`.
    pub fn try_context(
        &self,
        message: &str,
        level: Option<Level>,
    ) -> Result<OperationContext, EmptyMessage> {
        OperationContext::new(self.clone(), message, level)
    }

    /// Builds an operation context.
    ///
    /// # Panics
    ///
    /// Panics when `message` is empty or whitespace only. Use
    /// [`Logger::try_context`] for messages that are not string literals.
    #[must_use]
    #[track_caller]
    pub fn context(&self, message: &str, level: Option<Level>) -> OperationContext {
        match self.try_context(message, level) {
            Ok(context) => context,
            Err(error) => panic!("{error}"),
        }
    }

    /// Context completing at [`Level::Debug`]. Panics like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn debug_context(&self, message: &str) -> OperationContext {
        self.context(message, Some(Level::Debug))
    }

    /// Context completing at [`Level::Info`]. Panics like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn info_context(&self, message: &str) -> OperationContext {
        self.context(message, Some(Level::Info))
    }

    /// Context completing at [`Level::Warning`]. Panics like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn warning_context(&self, message: &str) -> OperationContext {
        self.context(message, Some(Level::Warning))
    }

    /// Context completing at [`Level::Error`]. Panics like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn error_context(&self, message: &str) -> OperationContext {
        self.context(message, Some(Level::Error))
    }

    /// Context completing at [`Level::Critical`]. Panics like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn critical_context(&self, message: &str) -> OperationContext {
        self.context(message, Some(Level::Critical))
    }

    /// Wraps `func` so every call runs inside a fresh operation context.
    ///
    /// # Panics
    ///
    /// Panics when `message` is empty, like [`Logger::context`].
    #[must_use]
    #[track_caller]
    pub fn instrument<F>(&self, message: &str, level: Option<Level>, func: F) -> Instrumented<F> {
        self.context(message, level).wrap(func)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("effective_level", &self.effective_level())
            .finish()
    }
}
