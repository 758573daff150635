use std::time::Duration;

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::HttpClientSettings;

/// Replacement for passwords found in URLs
const REDACTED: &str = "<redacted>";

/// Builds the HTTP client shared by every notifier
///
/// The client is created once at startup and handed to each notifier by
/// clone (`reqwest::Client` is a handle onto one connection pool).
///
/// # Features
/// - **Connection pooling**: idle connections are kept per host and reused
/// - **Timeouts**: request and connect timeouts from settings
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```ignore
/// let client = build_http_client(&settings.http)?;
/// let sms = SmsNotifier::new(sms_config, renderer.clone(), client.clone());
/// let voice = VoiceCallNotifier::new(voice_config, renderer, client);
/// ```
pub fn build_http_client(settings: &HttpClientSettings) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        // Connection pooling
        .pool_max_idle_per_host(settings.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(settings.pool_idle_timeout_secs))
        .gzip(true)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| ConfigError::ValidationError {
            field: "http".to_string(),
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Hides the password of a URL, keeping the username
pub fn redact_url(url: &mut Url) {
    if url.password().is_some() {
        // Only fails for URLs that cannot carry credentials at all
        let _ = url.set_password(Some(REDACTED));
    }
}

/// Hides credentials of the URL embedded in a transport error
pub fn redact_error(mut error: reqwest::Error) -> reqwest::Error {
    if let Some(url) = error.url_mut() {
        redact_url(url);
    }
    error
}
