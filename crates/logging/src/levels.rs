//! crates/logging/src/levels.rs
//! Severity levels and the name/value table used to configure them.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Numeric value of [`Level::NotSet`].
pub const NOTSET: u8 = 0;
/// Numeric value of [`Level::Debug`].
pub const DEBUG: u8 = 10;
/// Numeric value of [`Level::Info`].
pub const INFO: u8 = 20;
/// Numeric value of [`Level::Warning`].
pub const WARNING: u8 = 30;
/// Numeric value of [`Level::Error`].
pub const ERROR: u8 = 40;
/// Numeric value of [`Level::Critical`].
pub const CRITICAL: u8 = 50;

/// Ordered log severity.
///
/// `NotSet` sorts below every real severity. On a named logger it means "inherit
/// from the parent"; on the root logger it lets everything through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[repr(u8)]
pub enum Level {
    /// No explicit severity.
    #[default]
    NotSet = NOTSET,
    /// Detailed diagnostics, including operation start lines.
    Debug = DEBUG,
    /// Routine progress, the default completion severity.
    Info = INFO,
    /// Something unexpected that does not stop the program.
    Warning = WARNING,
    /// An operation failed.
    Error = ERROR,
    /// The program may not be able to continue.
    Critical = CRITICAL,
}

impl Level {
    /// The five severities accepted by [`Level::from_name`], lowest first.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Returns the numeric severity.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotSet => "NOTSET",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Looks up a level by name, ignoring case and surrounding whitespace.
    ///
    /// `WARN` is accepted as a synonym for `WARNING`. `NOTSET` is not a
    /// configurable severity and is rejected like any other unknown name.
    pub fn from_name(name: &str) -> Result<Self, UnknownLevel> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(UnknownLevel::new(name)),
        }
    }

    /// Maps a numeric severity back to its level, if it is one of the table entries.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            NOTSET => Some(Self::NotSet),
            DEBUG => Some(Self::Debug),
            INFO => Some(Self::Info),
            WARNING => Some(Self::Warning),
            ERROR => Some(Self::Error),
            CRITICAL => Some(Self::Critical),
            _ => None,
        }
    }

    /// Returns the closest `tracing` level. `Critical` shares `ERROR`.
    #[must_use]
    pub const fn as_tracing(self) -> tracing::Level {
        match self {
            Self::NotSet => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error | Self::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

/// Error returned when a level name is not one of the recognised severities.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown log level '{name}' (expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL)")]
pub struct UnknownLevel {
    name: String,
}

impl UnknownLevel {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    /// Returns the name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolves a level name to its numeric severity.
///
/// ```
/// assert_eq!(logging::level_value("warn"), logging::level_value("WARNING"));
/// assert_eq!(logging::level_value("Debug"), Ok(logging::DEBUG));
/// assert!(logging::level_value("verbose").is_err());
/// ```
pub fn level_value(name: &str) -> Result<u8, UnknownLevel> {
    Level::from_name(name).map(Level::value)
}

/// Returns the canonical name of a numeric severity.
///
/// Values outside the table render as `"Level N"`.
#[must_use]
pub fn level_name(value: u8) -> Cow<'static, str> {
    match Level::from_value(value) {
        Some(level) => Cow::Borrowed(level.name()),
        None => Cow::Owned(format!("Level {value}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_totally_ordered() {
        assert!(Level::NotSet < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Critical);
        assert!(Level::ALL.windows(2).all(|pair| pair[0].value() < pair[1].value()));
    }

    #[test]
    fn from_name_is_case_insensitive() {
        for level in Level::ALL {
            assert_eq!(Level::from_name(level.name()), Ok(level));
            assert_eq!(Level::from_name(&level.name().to_lowercase()), Ok(level));
        }
        assert_eq!(Level::from_name("  Info "), Ok(Level::Info));
    }

    #[test]
    fn warn_is_a_synonym() {
        assert_eq!(level_value("warn"), level_value("WARNING"));
        assert_eq!(Level::from_name("Warn"), Ok(Level::Warning));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let error = Level::from_name("verbose").expect_err("unknown");
        assert_eq!(error.name(), "verbose");
        assert!(error.to_string().contains("'verbose'"));
        assert!(Level::from_name("NOTSET").is_err());
        assert!(Level::from_name("").is_err());
    }

    #[test]
    fn level_name_round_trips_table_values() {
        for level in Level::ALL {
            assert_eq!(level_name(level.value()), level.name());
        }
        assert_eq!(level_name(NOTSET), "NOTSET");
        assert_eq!(level_name(15), "Level 15");
    }

    #[test]
    fn from_value_rejects_gaps() {
        assert_eq!(Level::from_value(WARNING), Some(Level::Warning));
        assert_eq!(Level::from_value(35), None);
    }

    #[test]
    fn parse_via_from_str() {
        let level: Level = "critical".parse().expect("parses");
        assert_eq!(level, Level::Critical);
        assert_eq!(level.to_string(), "CRITICAL");
        assert_eq!(u8::from(level), CRITICAL);
    }

    #[test]
    fn tracing_mapping() {
        assert_eq!(Level::Debug.as_tracing(), tracing::Level::DEBUG);
        assert_eq!(Level::Warning.as_tracing(), tracing::Level::WARN);
        assert_eq!(Level::Critical.as_tracing(), tracing::Level::ERROR);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Level::Warning).expect("serialize");
        assert_eq!(json, "\"WARNING\"");
        let decoded: Level = serde_json::from_str("\"CRITICAL\"").expect("deserialize");
        assert_eq!(decoded, Level::Critical);
    }
}
