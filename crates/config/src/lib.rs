#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/config/src/lib.rs
//!
//! # Overview
//!
//! `config` is a small, read-only configuration store keyed by
//! `(section, option)` pairs. Programs usually have a single configuration
//! file; the store loads it (or several, merged in order) once at startup and
//! then answers lookups.
//!
//! # Design
//!
//! [`Config`] owns two views of the loaded files: the raw text values as
//! parsed, and a resolved view in which `%(name)s` references are expanded and
//! `DEFAULT` options are folded into every section. Loading rebuilds both
//! views on a copy and only commits them when every file was read and parsed,
//! so a failed load never leaves a half-merged store behind. A value whose
//! references cannot be expanded is kept as written and reported by the
//! lookups of that value alone.
//!
//! The store is an ordinary value: the application constructs it and passes it
//! by reference to whoever needs it. [`Config::install`] offers a one-shot
//! process-wide slot for programs that prefer to reach it through [`global`].
//!
//! # Format
//!
//! ```ini
//! [DEFAULT]
//! root = /srv/app
//!
//! [foo]
//! bar = 42
//! data: %(root)s/data
//!
//! [log]
//! default = INFO
//! server.listener = DEBUG
//! ```
//!
//! # Examples
//!
//! ```
//! use config::{Config, ConfigError};
//!
//! let config: Config = "[foo]\nbar=42\n\n[bar]\nmagic=0xDEADBEAF\n".parse()?;
//!
//! assert_eq!(config.get("foo", "bar")?, "42");
//! assert!(matches!(config.get("bar", "foo"), Err(ConfigError::OptionNotFound { .. })));
//! assert_eq!(config.get_or("bar", "foo", None)?, None);
//! assert_eq!(config.sections(), ["foo", "bar"]);
//! assert_eq!(config.options("bar"), ["magic"]);
//! # Ok::<(), ConfigError>(())
//! ```

mod document;
mod error;
mod interpolate;
mod parser;
mod store;

pub use document::DEFAULT_SECTION;
pub use error::ConfigError;
pub use interpolate::MAX_INTERPOLATION_DEPTH;
pub use store::{Config, global};
