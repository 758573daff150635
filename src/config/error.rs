//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating notifier settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The merged sources could not be deserialized into settings
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds a value notifiers cannot work with
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Dotted path of the offending setting, e.g. `sms.api_url`
        field: String,
        message: String,
    },

    /// An environment variable holds an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two sources that exclude each other were both requested
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Error bubbled up from the config crate while merging sources
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
