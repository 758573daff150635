//! Voice-call notification provider implementation.
//!
//! Places a verification-code voice call per alert batch through the Yunpian
//! voice API.

use super::provider::{post_form, DispatchContext, FieldRenderer, Notifier};
use crate::config::VoiceCallConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::models::Alert;
use crate::template::TemplateRenderer;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default voice send endpoint
pub const SEND_CALL_URL: &str = "https://voice.yunpian.com/v2/voice/send.json";

/// Reply of the voice send API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceCallResponse {
    pub count: i64,
    pub fee: i64,
    pub sid: String,
}

impl std::fmt::Display for VoiceCallResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "count={} fee={} sid={}", self.count, self.fee, self.sid)
    }
}

impl VoiceCallResponse {
    /// Only `count > 1` is reported as delivered; every other reply is a
    /// terminal failure carrying the decoded reply. The threshold is kept as
    /// the provider integration has always applied it.
    pub fn into_result(self) -> NotifyResult<()> {
        if self.count > 1 {
            return Ok(());
        }
        Err(NotifyError::Provider {
            message: self.to_string(),
        })
    }
}

/// Voice-call notification provider
#[derive(Clone)]
pub struct VoiceCallNotifier {
    config: VoiceCallConfig,
    renderer: Arc<dyn TemplateRenderer>,
    client: reqwest::Client,
}

impl VoiceCallNotifier {
    pub fn new(
        config: VoiceCallConfig,
        renderer: Arc<dyn TemplateRenderer>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            renderer,
            client,
        }
    }

    pub fn config(&self) -> &VoiceCallConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for VoiceCallNotifier {
    async fn notify(&self, ctx: &DispatchContext, alerts: &[Alert]) -> NotifyResult<()> {
        let key = ctx.group_key()?;
        debug!(incident = %key, notifier = self.name(), alerts = alerts.len(), "dispatching");

        let data = ctx.template_data(key, alerts);
        let fields = FieldRenderer::new(self.renderer.as_ref(), &data);
        let params = [
            ("apikey", fields.render("api_key", self.config.api_key.expose())?),
            ("mobile", fields.render("mobile_nums", &self.config.mobile_nums)?),
            ("code", fields.render("code", &self.config.code.to_string())?),
        ];

        let reply = post_form(&self.client, &self.config.api_url, &params, ctx)
            .await
            .inspect_err(|e| warn!(incident = %key, error = %e, "voice call request failed"))?;

        if reply.status != StatusCode::OK {
            warn!(incident = %key, status = %reply.status, "voice provider returned error status");
            return Err(NotifyError::UnexpectedStatus {
                status: reply.status.as_u16(),
                body: None,
            });
        }

        let body = reply.body.map_err(NotifyError::BodyRead)?;
        debug!(response = %String::from_utf8_lossy(&body), incident = %key, "voice provider response");

        let response: VoiceCallResponse = serde_json::from_slice(&body)?;
        response.into_result()
    }

    fn name(&self) -> &'static str {
        "voice_call"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::truncated_reply_server;
    use super::*;
    use crate::template::{PlaceholderRenderer, TemplateData, TemplateError};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier(server: &MockServer) -> VoiceCallNotifier {
        let mut config = VoiceCallConfig::new("voice-key", "13800000000", 4096);
        config.api_url = format!("{}/v2/voice/send.json", server.uri());
        VoiceCallNotifier::new(config, Arc::new(PlaceholderRenderer), reqwest::Client::new())
    }

    /// Renderer that rejects every template
    struct BrokenRenderer;

    impl TemplateRenderer for BrokenRenderer {
        fn render(&self, _: &str, _: &TemplateData) -> Result<String, TemplateError> {
            Err(TemplateError::Engine("engine unavailable".to_string()))
        }
    }

    #[test]
    fn test_count_above_one_is_success() {
        let response = VoiceCallResponse {
            count: 2,
            fee: 1,
            sid: "abc".to_string(),
        };
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn test_count_one_or_less_is_terminal_failure() {
        for count in [-1, 0, 1] {
            let response = VoiceCallResponse {
                count,
                fee: 0,
                sid: "sid-1".to_string(),
            };
            let err = response.into_result().unwrap_err();
            assert!(!err.is_retryable());
            assert_eq!(err.to_string(), format!("count={} fee=0 sid=sid-1", count));
        }
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let response: VoiceCallResponse = serde_json::from_str(r#"{"sid":"x"}"#).unwrap();
        assert_eq!(response.count, 0);
        assert_eq!(response.fee, 0);
    }

    #[tokio::test]
    async fn test_voice_posts_code_as_decimal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/voice/send.json"))
            .and(body_string_contains("apikey=voice-key"))
            .and(body_string_contains("mobile=13800000000"))
            .and(body_string_contains("code=4096"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"count":2,"fee":1,"sid":"s-1"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = notifier(&server)
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(outcome.is_success(), "{:?}", outcome.error);
    }

    #[tokio::test]
    async fn test_voice_single_delivery_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"count":1,"fee":1,"sid":"s-2"}"#),
            )
            .mount(&server)
            .await;

        let outcome = notifier(&server)
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(!outcome.retryable);
        let message = outcome.error.unwrap().to_string();
        assert!(message.contains("count=1"));
        assert!(message.contains("sid=s-2"));
    }

    #[tokio::test]
    async fn test_voice_bad_status_omits_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal detail"))
            .mount(&server)
            .await;

        let outcome = notifier(&server)
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(outcome.retryable);
        assert_eq!(
            outcome.error.unwrap().to_string(),
            "unexpected status code 500"
        );
    }

    #[tokio::test]
    async fn test_voice_malformed_json_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("count=2"))
            .mount(&server)
            .await;

        let outcome = notifier(&server)
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(outcome.retryable);
        assert!(matches!(outcome.error, Some(NotifyError::Decode(_))));
    }

    #[tokio::test]
    async fn test_voice_truncated_body_is_retryable() {
        let mut config = VoiceCallConfig::new("voice-key", "13800000000", 4096);
        config.api_url = truncated_reply_server("/v2/voice/send.json").await;
        let notifier =
            VoiceCallNotifier::new(config, Arc::new(PlaceholderRenderer), reqwest::Client::new());

        let outcome = notifier
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(outcome.retryable);
        assert!(
            matches!(outcome.error, Some(NotifyError::BodyRead(_))),
            "{:?}",
            outcome.error
        );
    }

    #[tokio::test]
    async fn test_voice_template_error_is_terminal() {
        let server = MockServer::start().await;
        let mut config = VoiceCallConfig::new("voice-key", "13800000000", 1);
        config.api_url = format!("{}/v2/voice/send.json", server.uri());
        let notifier =
            VoiceCallNotifier::new(config, Arc::new(BrokenRenderer), reqwest::Client::new());

        let outcome = notifier
            .dispatch(&DispatchContext::new("ops", "group-1"), &[])
            .await;

        assert!(!outcome.retryable);
        assert!(matches!(
            outcome.error,
            Some(NotifyError::Template { field: "api_key", .. })
        ));
    }

    #[tokio::test]
    async fn test_voice_cancelled_while_in_flight() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"count":2,"fee":1,"sid":"s"}"#)
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let token = tokio_util::sync::CancellationToken::new();
        let ctx = DispatchContext::new("ops", "group-1").with_cancellation(token.clone());
        let notifier = notifier(&server);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            token.cancel();
        });

        let started = std::time::Instant::now();
        let outcome = notifier.dispatch(&ctx, &[]).await;
        canceller.await.unwrap();

        assert!(matches!(outcome.error, Some(NotifyError::Cancelled)));
        assert!(outcome.retryable);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}
