//! Core error types for the WooAnalytics client.
//!
//! This module defines the central error type shared by the workspace crates.
//! Subsystem crates keep their own error enums and convert into this one at
//! the application boundary.

use thiserror::Error;

/// Central error type for WooAnalytics operations.
#[derive(Error, Debug)]
pub enum WooError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WooError::Validation("empty task id".to_string());
        assert_eq!(err.to_string(), "validation error: empty task id");

        let err = ConfigError::InvalidValue {
            field: "polling.task_interval_secs".to_string(),
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for polling.task_interval_secs: must be greater than zero"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let woo_err: WooError = config_err.into();
        assert!(matches!(woo_err, WooError::Config(_)));
    }

    #[test]
    fn test_config_io_error_stays_wrapped() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let woo_err: WooError = ConfigError::from(io_err).into();
        assert!(matches!(woo_err, WooError::Config(ConfigError::Io(_))));
        assert_eq!(woo_err.to_string(), "configuration error: I/O error: test");
    }
}
