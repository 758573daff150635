//! Configuration validation logic
//!
//! Validation runs once after loading so notifiers can assume well-formed
//! settings at dispatch time.

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, HttpClientSettings, LoggerSettings, Settings, SmsConfig, VoiceCallConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Checks that a template setting is not blank
fn require_template(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(
            field,
            "Value is required and cannot be blank.",
        ));
    }
    Ok(())
}

/// Checks that an endpoint is an absolute http(s) URL
fn require_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::validation(field, format!("Invalid URL '{}': {}", value, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::validation(
            field,
            format!("URL must use http or https, got '{}'.", scheme),
        )),
    }
}

impl HttpClientSettings {
    /// Validate HTTP client settings
    ///
    /// # Validation Rules
    /// - Request and connect timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "http.timeout_secs",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "http.connect_timeout_secs",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl SmsConfig {
    /// Validate SMS notifier settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_template("sms.api_key", self.api_key.expose())?;
        require_template("sms.mobile", &self.mobile)?;
        require_template("sms.text", &self.text)?;
        require_http_url("sms.api_url", &self.api_url)
    }
}

impl VoiceCallConfig {
    /// Validate voice-call notifier settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_template("voice_call.api_key", self.api_key.expose())?;
        require_template("voice_call.mobile_nums", &self.mobile_nums)?;
        require_http_url("voice_call.api_url", &self.api_url)
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.http.validate()?;
        if let Some(sms) = &self.sms {
            sms.validate()?;
        }
        if let Some(voice_call) = &self.voice_call {
            voice_call.validate()?;
        }
        Ok(())
    }
}
