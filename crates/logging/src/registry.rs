//! crates/logging/src/registry.rs
//! Logger hierarchy: per-name severities, the root threshold and the shared sink.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::levels::Level;
use crate::logger::Logger;
use crate::sink::{Record, Sink};
use crate::thread_local::CaptureSink;
use crate::tracing_bridge::TracingSink;

/// Name reported by the root logger.
pub const ROOT_NAME: &str = "root";

/// Owns the severity of every logger and the sink their records go to.
///
/// Loggers are dotted names (`"app.db.pool"`). A logger without its own
/// severity inherits the nearest configured ancestor's, ending at the root
/// logger. Cloning a registry is cheap and yields a handle to the same state.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

struct Inner {
    root: RwLock<Level>,
    levels: RwLock<HashMap<String, Level>>,
    sink: Arc<dyn Sink>,
}

impl Registry {
    /// Creates a registry writing to `sink` with the root logger at `WARNING`.
    #[must_use]
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::with_shared_sink(Arc::new(sink))
    }

    /// Creates a registry around an already shared sink.
    #[must_use]
    pub fn with_shared_sink(sink: Arc<dyn Sink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                root: RwLock::new(Level::Warning),
                levels: RwLock::new(HashMap::new()),
                sink,
            }),
        }
    }

    /// Registry forwarding records to `tracing`.
    #[must_use]
    pub fn with_tracing() -> Self {
        Self::new(TracingSink)
    }

    /// Registry collecting records in the calling thread's capture buffer.
    #[must_use]
    pub fn with_capture() -> Self {
        Self::new(CaptureSink)
    }

    /// Handle to the root logger.
    #[must_use]
    pub fn root(&self) -> Logger {
        Logger::new(self.clone(), "")
    }

    /// Handle to the logger called `name`; an empty name is the root logger.
    ///
    /// Handles are lightweight and always observe the registry's current
    /// configuration.
    #[must_use]
    pub fn logger(&self, name: &str) -> Logger {
        Logger::new(self.clone(), name)
    }

    /// Sets the root logger's severity.
    pub fn set_root_level(&self, level: Level) {
        *self
            .inner
            .root
            .write()
            .unwrap_or_else(|poison| poison.into_inner()) = level;
    }

    /// The root logger's severity.
    #[must_use]
    pub fn root_level(&self) -> Level {
        *self
            .inner
            .root
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Sets the severity of `name`. `Level::NotSet` makes it inherit again.
    pub fn set_level(&self, name: &str, level: Level) {
        if name.is_empty() {
            self.set_root_level(level);
            return;
        }
        let mut levels = self
            .inner
            .levels
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        if level == Level::NotSet {
            levels.remove(name);
        } else {
            levels.insert(name.to_owned(), level);
        }
    }

    /// The severity set directly on `name`, `Level::NotSet` when it inherits.
    #[must_use]
    pub fn level(&self, name: &str) -> Level {
        if name.is_empty() {
            return self.root_level();
        }
        self.inner
            .levels
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .get(name)
            .copied()
            .unwrap_or_default()
    }

    /// Severity actually applied to records of `name`.
    ///
    /// Walks `a.b.c`, `a.b`, `a` and then the root, returning the first
    /// severity that is set.
    #[must_use]
    pub fn effective_level(&self, name: &str) -> Level {
        if !name.is_empty() {
            let levels = self
                .inner
                .levels
                .read()
                .unwrap_or_else(|poison| poison.into_inner());
            let mut current = name;
            loop {
                if let Some(level) = levels.get(current) {
                    return *level;
                }
                match current.rfind('.') {
                    Some(index) => current = &current[..index],
                    None => break,
                }
            }
        }
        self.root_level()
    }

    /// Hands a record to the sink without checking its severity.
    pub(crate) fn emit(&self, record: &Record<'_>) {
        self.inner.sink.emit(record);
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = self
            .inner
            .levels
            .read()
            .unwrap_or_else(|poison| poison.into_inner());
        f.debug_struct("Registry")
            .field("root", &self.root_level())
            .field("levels", &*levels)
            .finish_non_exhaustive()
    }
}
