//! crates/logging/src/tracing_bridge.rs
//! Bridge between logger records and the `tracing` ecosystem.
//!
//! [`TracingSink`] forwards every record as a `tracing` event with target
//! [`TARGET`], carrying the logger name and severity as fields. [`BasicLayer`]
//! is the matching `tracing-subscriber` layer that renders those events as
//! `SEVERITY:logger:message` lines, one per event.
//!
//! ```rust,ignore
//! use logging::{BasicLayer, Registry};
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! tracing_subscriber::registry().with(BasicLayer::new()).init();
//!
//! let registry = Registry::with_tracing();
//! registry.root().warning("disk almost full");
//! // WARNING:root:disk almost full
//! ```

use std::fmt;
use std::io::{self, Write};

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::levels::Level;
use crate::sink::{Record, Sink};

/// Target of every event emitted by [`TracingSink`].
pub const TARGET: &str = "opslog";

/// Sink that re-emits records as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

macro_rules! forward {
    ($level:expr, $record:expr) => {
        match $record.failure {
            Some(failure) => ::tracing::event!(
                target: TARGET,
                $level,
                logger = $record.logger,
                severity = $record.level.name(),
                error = failure.message(),
                detail = failure.detail(),
                "{}",
                $record.message
            ),
            None => ::tracing::event!(
                target: TARGET,
                $level,
                logger = $record.logger,
                severity = $record.level.name(),
                "{}",
                $record.message
            ),
        }
    };
}

impl Sink for TracingSink {
    fn emit(&self, record: &Record<'_>) {
        match record.level {
            Level::NotSet => forward!(tracing::Level::TRACE, record),
            Level::Debug => forward!(tracing::Level::DEBUG, record),
            Level::Info => forward!(tracing::Level::INFO, record),
            Level::Warning => forward!(tracing::Level::WARN, record),
            Level::Error | Level::Critical => forward!(tracing::Level::ERROR, record),
        }
    }
}

/// Layer rendering events as `SEVERITY:logger:message` lines.
///
/// Events from [`TracingSink`] were already filtered by their logger's
/// severity and are always written. Events from other targets are written
/// when they pass the layer's foreign level (default `WARN`), using the
/// event target as the logger name.
pub struct BasicLayer<W = fn() -> io::Stderr> {
    make_writer: W,
    foreign: LevelFilter,
}

impl BasicLayer {
    /// Creates a layer writing to standard error.
    #[must_use]
    pub fn new() -> Self {
        Self {
            make_writer: io::stderr,
            foreign: LevelFilter::WARN,
        }
    }
}

impl Default for BasicLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> BasicLayer<W> {
    /// Replaces the destination of rendered lines.
    #[must_use]
    pub fn with_writer<W2>(self, make_writer: W2) -> BasicLayer<W2>
    where
        W2: for<'w> MakeWriter<'w> + 'static,
    {
        BasicLayer {
            make_writer,
            foreign: self.foreign,
        }
    }

    /// Sets the most verbose level written for events not produced by [`TracingSink`].
    #[must_use]
    pub fn with_foreign_level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.foreign = level.into();
        self
    }
}

impl<W> fmt::Debug for BasicLayer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicLayer")
            .field("foreign", &self.foreign)
            .finish_non_exhaustive()
    }
}

impl<S, W> Layer<S> for BasicLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let ours = metadata.target() == TARGET;
        if !ours && *metadata.level() > self.foreign {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let severity = visitor
            .severity
            .unwrap_or_else(|| severity_for(*metadata.level()).to_owned());
        let logger = visitor
            .logger
            .unwrap_or_else(|| metadata.target().to_owned());
        let message = visitor.message.unwrap_or_default();

        let mut writer = self.make_writer.make_writer_for(metadata);
        // A broken stderr must not take the program down with it.
        let _ = writeln!(writer, "{severity}:{logger}:{message}");
    }
}

const fn severity_for(level: tracing::Level) -> &'static str {
    match level {
        tracing::Level::ERROR => "ERROR",
        tracing::Level::WARN => "WARNING",
        tracing::Level::INFO => "INFO",
        tracing::Level::DEBUG | tracing::Level::TRACE => "DEBUG",
    }
}

/// Visitor collecting the fields [`TracingSink`] attaches to its events.
#[derive(Default)]
struct LineVisitor {
    message: Option<String>,
    logger: Option<String>,
    severity: Option<String>,
}

impl tracing::field::Visit for LineVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{value:?}")),
            "logger" => self.logger = Some(format!("{value:?}")),
            "severity" => self.severity = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_owned()),
            "logger" => self.logger = Some(value.to_owned()),
            "severity" => self.severity = Some(value.to_owned()),
            _ => {}
        }
    }
}

/// Installs a global subscriber rendering lines with [`BasicLayer`].
///
/// Returns `false` when a global subscriber was already set, in which case
/// nothing changes.
pub fn install_basic_subscriber(foreign: Level) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(BasicLayer::new().with_foreign_level(foreign.as_tracing()))
        .try_init()
        .is_ok()
}
