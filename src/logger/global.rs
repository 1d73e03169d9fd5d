//! The process-wide logger.

use std::sync::OnceLock;

use thiserror::Error;

use crate::config::LoggerConfig;
use crate::logger::Logger;
use crate::sink::TracingSink;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Errors from installing the process-wide logger.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The logger was already constructed, by an earlier `init` or by a
    /// call to [`logger`].
    #[error("logger already initialized")]
    AlreadyInitialized,
}

/// The process-wide logger.
///
/// The first call constructs a `tracing`-backed logger accepting every
/// level; concurrent first calls block until that construction finishes
/// and all callers get the same instance.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(TracingSink::new()))
}

/// Install `logger` as the process-wide logger.
///
/// Fails if the logger has already been constructed.
pub fn init(logger: Logger) -> Result<&'static Logger, LoggerError> {
    let mut installed = false;
    let current = LOGGER.get_or_init(|| {
        installed = true;
        logger
    });

    if installed {
        Ok(current)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// Install a logger built from the `Logger` configuration section.
pub fn init_from_config(config: &LoggerConfig) -> Result<&'static Logger, LoggerError> {
    let logger = init(Logger::from_config(config))?;
    tracing::debug!(
        level = %config.level,
        exit_code = config.fatal_exit_code,
        "Logger installed from configuration"
    );
    Ok(logger)
}
