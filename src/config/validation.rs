//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (exit codes, non-empty names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A fatal entry must not exit with a success status.
    #[error("Logger.FatalExitCode must be non-zero")]
    ZeroFatalExitCode,

    /// Exit statuses outside 1..=255 are truncated by the OS.
    #[error("Logger.FatalExitCode {0} is outside 1..=255")]
    FatalExitCodeOutOfRange(i32),

    #[error("Server.Name must not be empty")]
    EmptyServerName,
}

/// Check every semantic rule and report all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.logger.fatal_exit_code {
        0 => errors.push(ValidationError::ZeroFatalExitCode),
        code if !(1..=255).contains(&code) => {
            errors.push(ValidationError::FatalExitCodeOutOfRange(code))
        }
        _ => {}
    }

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::EmptyServerName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = AppConfig::default();
        config.logger.fatal_exit_code = 0;
        config.server.name = " ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ZeroFatalExitCode, ValidationError::EmptyServerName]
        );
    }

    #[test]
    fn test_exit_code_range() {
        let mut config = AppConfig::default();
        config.logger.fatal_exit_code = 300;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::FatalExitCodeOutOfRange(300)]);
    }
}
