//! crates/logging/src/init.rs
//! Startup configuration of logger severities from the `[log]` section.
//!
//! ```ini
//! [log]
//! default = INFO
//! server.listener = DEBUG
//! ```
//!
//! `default` sets the root logger. Every other option names a logger and the
//! severity it should use.

use config::{Config, ConfigError};
use thiserror::Error;

use crate::levels::{Level, UnknownLevel};
use crate::registry::Registry;
use crate::tracing_bridge::install_basic_subscriber;

/// Section read by [`configure`].
pub const LOG_SECTION: &str = "log";
/// Option holding the root severity.
pub const DEFAULT_OPTION: &str = "default";
/// Root severity used when neither the caller nor the configuration sets one.
pub const DEFAULT_LEVEL_NAME: &str = "INFO";

/// Error raised when the `[log]` section cannot be applied.
#[derive(Debug, Error)]
pub enum InitError {
    /// A `[log]` value could not be read, for example because of a bad `%` reference.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `log.default` is not a severity name.
    #[error("invalid default log level: {0}")]
    Default(#[source] UnknownLevel),
    /// A per-logger option is not a severity name.
    #[error("invalid log level for logger '{logger}': {source}")]
    Logger {
        /// The logger whose option failed.
        logger: String,
        /// The rejected name.
        #[source]
        source: UnknownLevel,
    },
}

impl InitError {
    /// The severity name that failed to resolve, if the failure was an unknown name.
    #[must_use]
    pub fn level_name(&self) -> Option<&str> {
        match self {
            Self::Default(source) | Self::Logger { source, .. } => Some(source.name()),
            Self::Config(_) => None,
        }
    }
}

/// Applies the `[log]` section of `config` to `registry`.
///
/// The root severity is `level` when given, else `log.default`, else
/// `INFO`. Returns the root severity that was applied. On error the root
/// and any loggers processed before the failing option keep their new
/// severities.
pub fn configure(
    registry: &Registry,
    config: &Config,
    level: Option<Level>,
) -> Result<Level, InitError> {
    let root = match level {
        Some(level) => level,
        None => {
            let name = config
                .get_or(LOG_SECTION, DEFAULT_OPTION, Some(DEFAULT_LEVEL_NAME))?
                .unwrap_or(DEFAULT_LEVEL_NAME);
            Level::from_name(name).map_err(InitError::Default)?
        }
    };
    registry.set_root_level(root);

    for logger in config.options(LOG_SECTION) {
        if logger == DEFAULT_OPTION {
            continue;
        }
        let Some(value) = config.get_or(LOG_SECTION, logger, None)? else {
            continue;
        };
        let severity = Level::from_name(value).map_err(|source| InitError::Logger {
            logger: logger.to_owned(),
            source,
        })?;
        registry.set_level(logger, severity);
    }

    Ok(root)
}

/// Builds a registry forwarding to `tracing`, configures it from `config`
/// and installs the basic line subscriber unless one is already set.
pub fn init(config: &Config, level: Option<Level>) -> Result<Registry, InitError> {
    let registry = Registry::with_tracing();
    let root = configure(&registry, config, level)?;
    if !install_basic_subscriber(root) {
        tracing::debug!("global tracing subscriber already installed");
    }
    Ok(registry)
}
