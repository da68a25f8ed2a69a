#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` provides leveled, named loggers and an operation-scoped logging
//! primitive. An operation context logs a `DEBUG` line when a unit of work
//! starts and then either a completion line at a chosen severity or an
//! `ERROR` line when the work fails. The lines are built from the message's
//! leading verb: `"Print some nice words"` yields `"Printing some nice
//! words."`, `"Some nice words printed."` and `"Cannot print some nice
//! words."`.
//!
//! # Design
//!
//! - [`Registry`] holds the root severity, per-logger overrides and the
//!   [`Sink`] records go to. Named loggers inherit from their nearest dotted
//!   ancestor.
//! - [`Logger`] is a cheap handle into a registry. It logs plain lines and
//!   builds [`OperationContext`]s.
//! - [`OperationScope`] is the guard at the heart of every entry point:
//!   [`OperationContext::run`], [`OperationContext::scoped`] and the
//!   [`Instrumented`] call wrapper all settle through it.
//! - [`TracingSink`] forwards records to `tracing`; [`BasicLayer`] renders
//!   them as `SEVERITY:logger:message`. [`CaptureSink`] keeps records in a
//!   thread-local buffer for tests.
//! - [`init()`] reads the `[log]` section of a [`config::Config`] and wires
//!   everything together.
//!
//! # Invariants
//!
//! - A scope leaves [`Phase::Active`] exactly once.
//! - Errors observed by a scope are returned to the caller unchanged.
//! - A panic that starts while a scope is active logs the failure line and
//!   keeps unwinding. A scope entered during an unwind already in progress
//!   completes normally.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, Registry, drain_records};
//!
//! let config: config::Config = "[log]\ndefault = DEBUG\n".parse()?;
//! let registry = Registry::with_capture();
//! logging::configure(&registry, &config, None)?;
//!
//! let logger = registry.logger("demo");
//! logger.info_context("Print some nice words").scoped(|| ());
//!
//! let lines: Vec<_> = drain_records()
//!     .into_iter()
//!     .map(|record| format!("{}:{}:{}", record.level, record.logger, record.message))
//!     .collect();
//! assert_eq!(
//!     lines,
//!     [
//!         "DEBUG:demo:Printing some nice words.",
//!         "INFO:demo:Some nice words printed.",
//!     ]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod init;
mod instrument;
mod levels;
mod logger;
mod registry;
mod sink;
mod thread_local;
mod tracing_bridge;
mod verb;

pub use context::{OperationContext, OperationScope, Phase};
pub use init::{DEFAULT_LEVEL_NAME, DEFAULT_OPTION, InitError, LOG_SECTION, configure, init};
pub use instrument::Instrumented;
pub use levels::{
    CRITICAL, DEBUG, ERROR, INFO, Level, NOTSET, UnknownLevel, WARNING, level_name, level_value,
};
pub use logger::Logger;
pub use registry::{ROOT_NAME, Registry};
pub use sink::{Failure, Record, Sink};
pub use thread_local::{CaptureSink, CapturedRecord, drain_records};
pub use tracing_bridge::{BasicLayer, TARGET, TracingSink, install_basic_subscriber};
pub use verb::{EmptyMessage, MessageDescriptor};
