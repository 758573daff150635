//! Configuration settings structures for the notifiers
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::models::Secret;
use crate::services::notifications::{SEND_CALL_URL, SEND_SMS_URL};

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notifier.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pool_max_idle_per_host() -> usize {
    10
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

fn default_user_agent() -> String {
    format!("yunpian-notifier/{}", crate::pkg_version())
}

fn default_sms_api_url() -> String {
    SEND_SMS_URL.to_string()
}

fn default_call_api_url() -> String {
    SEND_CALL_URL.to_string()
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Settings for the HTTP client shared by all notifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientSettings {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Idle connections kept per provider host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Seconds an idle pooled connection is kept
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// ============================================================================
// Notifier Configuration
// ============================================================================

/// SMS notifier configuration
///
/// `api_key`, `mobile` and `text` are templates rendered per dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    pub api_key: Secret,

    /// Recipient mobile number
    pub mobile: String,

    /// Message text
    pub text: String,

    /// Provider endpoint
    #[serde(default = "default_sms_api_url")]
    pub api_url: String,
}

impl SmsConfig {
    pub fn new(api_key: impl Into<String>, mobile: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key),
            mobile: mobile.into(),
            text: text.into(),
            api_url: default_sms_api_url(),
        }
    }
}

/// Voice-call notifier configuration
///
/// `api_key` and `mobile_nums` are templates rendered per dispatch; `code` is
/// rendered as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCallConfig {
    pub api_key: Secret,

    /// Recipient mobile number(s)
    pub mobile_nums: String,

    /// Verification code read out in the call
    pub code: u32,

    /// Provider endpoint
    #[serde(default = "default_call_api_url")]
    pub api_url: String,
}

impl VoiceCallConfig {
    pub fn new(api_key: impl Into<String>, mobile_nums: impl Into<String>, code: u32) -> Self {
        Self {
            api_key: Secret::new(api_key),
            mobile_nums: mobile_nums.into(),
            code,
            api_url: default_call_api_url(),
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format)
            .map_err(|e| ConfigError::validation("logger.file", e.to_string()))
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root settings; a notifier is built for every section present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub http: HttpClientSettings,

    #[serde(default)]
    pub sms: Option<SmsConfig>,

    #[serde(default)]
    pub voice_call: Option<VoiceCallConfig>,
}
