//! crates/logging/src/instrument.rs
//! Call wrapper running a function inside an operation context.

use std::any;
use std::borrow::Cow;
use std::fmt;

use crate::context::OperationContext;
use crate::levels::Level;

/// A function whose every call is logged as one operation.
///
/// Arguments are passed as a single value, a tuple when the wrapped
/// function needs several. The return value is handed back unchanged.
///
/// The `call*` methods wrap functions returning a [`Result`] and log the
/// failure line for an `Err`. The `invoke*` methods wrap functions that
/// cannot fail; their calls fail only by panicking.
///
/// ```
/// use logging::{Level, Registry, drain_records};
///
/// let registry = Registry::with_capture();
/// registry.set_root_level(Level::Debug);
/// let add = registry.logger("math").instrument(
///     "Add the operands",
///     None,
///     |(a, b): (i32, i32)| a.checked_add(b).ok_or("overflow"),
/// );
///
/// assert_eq!(add.call((2, 3)), Ok(5));
/// assert_eq!(add.call((i32::MAX, 1)), Err("overflow"));
/// assert_eq!(drain_records().len(), 4);
/// ```
#[derive(Clone)]
pub struct Instrumented<F> {
    context: OperationContext,
    name: Cow<'static, str>,
    func: F,
}

impl<F> Instrumented<F> {
    pub(crate) fn new(context: OperationContext, func: F) -> Self {
        Self {
            context,
            name: Cow::Borrowed(any::type_name::<F>()),
            func,
        }
    }

    /// Name of the wrapped callable, its type name unless overridden.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the reported name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// The context each call is built from.
    #[must_use]
    pub const fn context(&self) -> &OperationContext {
        &self.context
    }

    /// Completion severity of every call.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.context.level()
    }

    /// The wrapped callable.
    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.func
    }

    /// Unwraps the callable, dropping the logging.
    #[must_use]
    pub fn into_inner(self) -> F {
        self.func
    }

    /// Calls the wrapped function inside a new scope.
    pub fn call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Result<T, E>,
        E: fmt::Display + fmt::Debug,
    {
        self.context.run(|| (self.func)(args))
    }

    /// Calls a stateful wrapped function inside a new scope.
    pub fn call_mut<A, T, E>(&mut self, args: A) -> Result<T, E>
    where
        F: FnMut(A) -> Result<T, E>,
        E: fmt::Display + fmt::Debug,
    {
        let func = &mut self.func;
        self.context.run(|| func(args))
    }

    /// Consumes the wrapper and calls the function once.
    pub fn call_once<A, T, E>(self, args: A) -> Result<T, E>
    where
        F: FnOnce(A) -> Result<T, E>,
        E: fmt::Display + fmt::Debug,
    {
        let Self { context, func, .. } = self;
        context.run(|| func(args))
    }

    /// Calls an infallible wrapped function inside a new scope.
    pub fn invoke<A, T>(&self, args: A) -> T
    where
        F: Fn(A) -> T,
    {
        self.context.scoped(|| (self.func)(args))
    }

    /// Calls an infallible stateful wrapped function inside a new scope.
    pub fn invoke_mut<A, T>(&mut self, args: A) -> T
    where
        F: FnMut(A) -> T,
    {
        let func = &mut self.func;
        self.context.scoped(|| func(args))
    }

    /// Consumes the wrapper and calls the infallible function once.
    pub fn invoke_once<A, T>(self, args: A) -> T
    where
        F: FnOnce(A) -> T,
    {
        let Self { context, func, .. } = self;
        context.scoped(|| func(args))
    }
}

impl<F> fmt::Debug for Instrumented<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("name", &self.name)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
