//! CLI-specific error types and mappings.
//!
//! Maps core errors to exit codes and user-facing messages.

use devcon_core::{CoreError, RegistryError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core error during setup.
    #[error("{0}")]
    Core(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `-c` command line failed.
    #[error("Command failed: {0}")]
    Command(String),

    /// The line editor could not be set up or read from.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) | Self::Command(_) => 1,
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Terminal(_) => 71, // EX_OSERR
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Registry(registry_err) => Self::Core(registry_err.to_string()),
            CoreError::Settings(settings_err) => Self::Config(settings_err.to_string()),
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Self::Terminal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Command("x".into()).exit_code(), 1);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: CliError = SettingsError::InvalidLogCapacity(0).into();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);

        let err: CliError = RegistryError::InvalidName(String::new()).into();
        assert!(matches!(err, CliError::Core(_)));
    }

    #[test]
    fn test_json_error_is_config() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CliError = json_err.into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
