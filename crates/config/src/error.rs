//! crates/config/src/error.rs
//! Errors produced while loading or querying a configuration store.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading configuration files or looking up values.
///
/// Load failures ([`Io`](Self::Io) and [`Parse`](Self::Parse)) leave the
/// store untouched. Lookup misses ([`SectionNotFound`](Self::SectionNotFound)
/// and [`OptionNotFound`](Self::OptionNotFound)) are only returned when the
/// caller did not supply a default. [`Interpolation`](Self::Interpolation) is
/// returned by lookups of the one value that cannot be expanded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line could not be parsed.
    #[error("{}: line {line}: {message}", path.display())]
    Parse {
        /// File (or pseudo-path for in-memory input) containing the bad line.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the syntax problem.
        message: String,
    },
    /// A `%(name)s` reference could not be expanded.
    #[error("bad value for option '{option}' in section '{section}': {message}")]
    Interpolation {
        /// Section whose context was used for the expansion.
        section: String,
        /// Option holding the offending value.
        option: String,
        /// Description of the expansion problem.
        message: String,
    },
    /// The requested section does not exist.
    #[error("no section: '{section}'")]
    SectionNotFound {
        /// Requested section name.
        section: String,
    },
    /// The section exists but does not define the requested option.
    #[error("no option '{option}' in section: '{section}'")]
    OptionNotFound {
        /// Section that was searched.
        section: String,
        /// Requested option name.
        option: String,
    },
    /// A value exists but cannot be converted to the requested type.
    #[error("invalid value '{value}' for option '{option}' in section '{section}': expected {expected}")]
    InvalidValue {
        /// Section holding the value.
        section: String,
        /// Option holding the value.
        option: String,
        /// The raw value that failed to convert.
        value: String,
        /// Human readable description of the accepted values.
        expected: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn io_error(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Returns the line number where a parse error occurred, if available.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Returns the configuration file associated with a load error.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Reports whether the error is a lookup miss that a default would have absorbed.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound { .. } | Self::OptionNotFound { .. }
        )
    }
}
