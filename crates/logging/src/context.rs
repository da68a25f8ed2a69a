//! crates/logging/src/context.rs
//! Scoped operation logging.
//!
//! An [`OperationContext`] describes a unit of work: the logger, the message
//! it was built from and the severity used when the work completes. Entering
//! it yields an [`OperationScope`] guard that logs the start line at
//! `DEBUG` and then exactly one of the completion or failure lines.
//!
//! ```
//! use logging::{Level, Registry, drain_records};
//!
//! let registry = Registry::with_capture();
//! registry.set_root_level(Level::Debug);
//! let context = registry.logger("app").info_context("Print some nice words");
//!
//! let result: Result<(), String> = context.run(|| Err("no paper".to_owned()));
//! assert_eq!(result, Err("no paper".to_owned()));
//!
//! let records = drain_records();
//! assert_eq!(records[0].message, "Printing some nice words.");
//! assert_eq!(records[1].message, "Cannot print some nice words.");
//! assert_eq!(records[1].level, Level::Error);
//! ```

use std::fmt;
use std::thread;

use crate::instrument::Instrumented;
use crate::levels::Level;
use crate::logger::Logger;
use crate::sink::Failure;
use crate::verb::{EmptyMessage, MessageDescriptor};

/// Where an entered operation is in its lifecycle.
///
/// An [`OperationContext`] that has not been entered has no phase of its
/// own; the phase exists only on the [`OperationScope`] that entry creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Start line logged, outcome pending.
    Active,
    /// Completion line logged.
    Completed,
    /// Failure line logged.
    Failed,
}

impl Phase {
    /// Whether the phase is [`Phase::Completed`] or [`Phase::Failed`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A described unit of work bound to a logger.
///
/// Contexts are templates: every [`OperationContext::enter`] starts a new,
/// single-use scope, so the same context may be entered repeatedly.
#[derive(Clone, Debug)]
pub struct OperationContext {
    logger: Logger,
    descriptor: MessageDescriptor,
    level: Level,
}

impl OperationContext {
    /// Builds a context; `level` defaults to [`Level::Info`].
    pub fn new(logger: Logger, message: &str, level: Option<Level>) -> Result<Self, EmptyMessage> {
        let descriptor = MessageDescriptor::parse(message)?;
        Ok(Self::from_parts(logger, descriptor, level.unwrap_or(Level::Info)))
    }

    /// Builds a context from an already parsed message.
    #[must_use]
    pub const fn from_parts(logger: Logger, descriptor: MessageDescriptor, level: Level) -> Self {
        Self {
            logger,
            descriptor,
            level,
        }
    }

    /// The logger lines are emitted through.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The parsed message.
    #[must_use]
    pub const fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Severity of the completion line.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Logs the start line and returns the guard tracking the outcome.
    #[must_use = "dropping the scope immediately completes the operation"]
    pub fn enter(&self) -> OperationScope<'_> {
        self.logger
            .emit(Level::Debug, &self.descriptor.starting_line(), None);
        OperationScope {
            context: self,
            phase: Phase::Active,
            panicking_on_enter: thread::panicking(),
        }
    }

    /// Runs `f` inside a scope and returns its result unchanged.
    pub fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display + fmt::Debug,
    {
        let scope = self.enter();
        scope.finish(f())
    }

    /// Runs an infallible `f` inside a scope.
    ///
    /// The operation completes when `f` returns and fails if it panics.
    pub fn scoped<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let scope = self.enter();
        let value = f();
        scope.complete();
        value
    }

    /// Turns this context into a call wrapper around `func`.
    #[must_use]
    pub fn wrap<F>(self, func: F) -> Instrumented<F> {
        Instrumented::new(self, func)
    }
}

/// Guard for one entered operation.
///
/// Exactly one of [`complete`](Self::complete), [`fail`](Self::fail) or
/// [`finish`](Self::finish) settles the scope. Dropping an unsettled scope
/// completes it, unless a panic started while it was active, in which case
/// it fails. A scope entered while the thread was already unwinding, for
/// example from another value's `Drop`, completes normally.
#[derive(Debug)]
pub struct OperationScope<'a> {
    context: &'a OperationContext,
    phase: Phase,
    panicking_on_enter: bool,
}

impl OperationScope<'_> {
    /// Current phase; [`Phase::Active`] until the scope is settled.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Logs the completion line.
    pub fn complete(mut self) {
        self.settle(None);
    }

    /// Logs the failure line with `error` attached.
    pub fn fail<E>(mut self, error: &E)
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        self.settle(Some(Failure::from_error(error)));
    }

    /// Settles the scope from `result` and hands it back untouched.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E>
    where
        E: fmt::Display + fmt::Debug,
    {
        match &result {
            Ok(_) => self.complete(),
            Err(error) => self.fail(error),
        }
        result
    }

    fn settle(&mut self, failure: Option<Failure>) {
        if self.phase != Phase::Active {
            return;
        }
        let context = self.context;
        match failure {
            None => {
                self.phase = Phase::Completed;
                context.logger.emit(
                    context.level,
                    &context.descriptor.completed_line(),
                    None,
                );
            }
            Some(failure) => {
                self.phase = Phase::Failed;
                context.logger.emit(
                    Level::Error,
                    &context.descriptor.failed_line(),
                    Some(&failure),
                );
            }
        }
    }
}

impl Drop for OperationScope<'_> {
    fn drop(&mut self) {
        if thread::panicking() && !self.panicking_on_enter {
            self.settle(Some(Failure::panicked()));
        } else {
            self.settle(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::thread_local::drain_records;

    fn debug_registry() -> Registry {
        drain_records();
        let registry = Registry::with_capture();
        registry.set_root_level(Level::Debug);
        registry
    }

    fn lines() -> Vec<(Level, String)> {
        drain_records()
            .into_iter()
            .map(|record| (record.level, record.message))
            .collect()
    }

    #[test]
    fn building_a_context_logs_nothing() {
        let registry = debug_registry();
        let _context = registry.root().info_context("Print");
        assert!(lines().is_empty());
    }

    #[test]
    fn enter_logs_start_and_is_active() {
        let registry = debug_registry();
        let context = registry.root().info_context("Print some nice words");
        let scope = context.enter();
        assert_eq!(scope.phase(), Phase::Active);
        assert_eq!(
            lines(),
            [(Level::Debug, "Printing some nice words.".to_owned())]
        );
        scope.complete();
        assert_eq!(
            lines(),
            [(Level::Info, "Some nice words printed.".to_owned())]
        );
    }

    #[test]
    fn finish_settles_once() {
        let registry = debug_registry();
        let context = registry.root().warning_context("Save state");
        let scope = context.enter();
        let result: Result<u8, String> = scope.finish(Ok(7));
        assert_eq!(result, Ok(7));
        assert_eq!(
            lines(),
            [
                (Level::Debug, "Saving state.".to_owned()),
                (Level::Warning, "State saved.".to_owned())
            ]
        );
    }

    #[test]
    fn failure_attaches_error_detail() {
        let registry = debug_registry();
        let context = registry.root().info_context("Open the file");
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        context.enter().fail(&error);

        let records = drain_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "Cannot open the file.");
        let failure = records[1].failure.as_ref().expect("failure attached");
        assert_eq!(failure.message(), "missing");
        assert!(failure.detail().contains("NotFound"));
    }

    #[test]
    fn dropped_scope_completes() {
        let registry = debug_registry();
        let context = registry.root().info_context("Print");
        {
            let _scope = context.enter();
        }
        assert_eq!(
            lines(),
            [
                (Level::Debug, "Printing.".to_owned()),
                (Level::Info, "Print printed.".to_owned())
            ]
        );
    }

    #[test]
    fn context_is_reusable() {
        let registry = debug_registry();
        let context = registry.root().info_context("Print");
        context.scoped(|| ());
        context.scoped(|| ());
        assert_eq!(lines().len(), 4);
    }

    #[test]
    fn completion_below_threshold_is_suppressed() {
        drain_records();
        let registry = Registry::with_capture();
        registry.set_root_level(Level::Info);
        let context = registry.root().debug_context("Print");
        context.scoped(|| ());
        assert!(lines().is_empty());

        let context = registry.root().info_context("Print");
        let outcome: Result<(), &str> = context.run(|| Err("jammed"));
        assert_eq!(outcome, Err("jammed"));
        assert_eq!(lines(), [(Level::Error, "Cannot print.".to_owned())]);
    }

    #[test]
    fn phase_terminal_states() {
        assert!(Phase::Completed.is_terminal());
        assert!(Phase::Failed.is_terminal());
        assert!(!Phase::Active.is_terminal());
    }

    struct CleanupOnDrop<'a> {
        context: &'a OperationContext,
    }

    impl Drop for CleanupOnDrop<'_> {
        fn drop(&mut self) {
            let scope = self.context.enter();
            assert_eq!(scope.phase(), Phase::Active);
        }
    }

    #[test]
    fn scope_inside_unwinding_drop_completes() {
        let registry = debug_registry();
        let context = registry.root().info_context("Flush the buffer");

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _cleanup = CleanupOnDrop { context: &context };
            panic!("unrelated failure");
        }));

        assert!(unwound.is_err());
        assert_eq!(
            lines(),
            [
                (Level::Debug, "Flushing the buffer.".to_owned()),
                (Level::Info, "The buffer flushed.".to_owned())
            ]
        );
    }
}
