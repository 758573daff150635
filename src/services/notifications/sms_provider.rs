//! SMS notification provider implementation.
//!
//! Sends one text message per alert batch through the Yunpian single-send API.
//! Uses the shared HTTP client handed in at construction.
//!
//! Yunpian API Reference: https://www.yunpian.com/official/document/sms/zh_CN/domestic_single_send

use super::provider::{post_form, DispatchContext, FieldRenderer, Notifier};
use crate::config::SmsConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::models::Alert;
use crate::template::TemplateRenderer;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default SMS send endpoint
pub const SEND_SMS_URL: &str = "https://sms.yunpian.com/v2/sms/single_send.json";

/// Reply of the single-send API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsResponse {
    pub code: i64,
    pub msg: String,
    pub count: i64,
    pub fee: f64,
    pub unit: String,
    /// Field name as spelled by the provider
    #[serde(rename = "moble")]
    pub mobile: String,
    pub sid: i64,
}

impl SmsResponse {
    /// A positive `code` means the message was accepted; anything else is a
    /// rejection carrying the provider's own message
    pub fn into_result(self) -> NotifyResult<()> {
        if self.code > 0 {
            Ok(())
        } else {
            Err(NotifyError::Provider { message: self.msg })
        }
    }
}

/// SMS notification provider
///
/// # Example
/// ```ignore
/// let config = SmsConfig::new("{{ CommonLabels.apikey }}", "13800000000", "[{{ Status }}] {{ CommonLabels.alertname }}");
/// let notifier = SmsNotifier::new(config, Arc::new(PlaceholderRenderer), client);
/// let outcome = notifier.dispatch(&ctx, &alerts).await;
/// ```
#[derive(Clone)]
pub struct SmsNotifier {
    config: SmsConfig,
    renderer: Arc<dyn TemplateRenderer>,
    client: reqwest::Client,
}

impl SmsNotifier {
    /// Creates a new SMS notifier
    ///
    /// # Arguments
    /// * `config` - API key, recipient and text templates, endpoint
    /// * `renderer` - Template collaborator
    /// * `client` - Shared HTTP client
    pub fn new(
        config: SmsConfig,
        renderer: Arc<dyn TemplateRenderer>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            renderer,
            client,
        }
    }

    pub fn config(&self) -> &SmsConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    /// Sends the rendered text to the rendered mobile number
    ///
    /// Transport, status, read and decode failures are retryable; template
    /// errors and provider rejections are not.
    async fn notify(&self, ctx: &DispatchContext, alerts: &[Alert]) -> NotifyResult<()> {
        let key = ctx.group_key()?;
        debug!(incident = %key, notifier = self.name(), alerts = alerts.len(), "dispatching");

        let data = ctx.template_data(key, alerts);
        let fields = FieldRenderer::new(self.renderer.as_ref(), &data);
        let params = [
            ("apikey", fields.render("api_key", self.config.api_key.expose())?),
            ("mobile", fields.render("mobile", &self.config.mobile)?),
            ("text", fields.render("text", &self.config.text)?),
        ];

        let reply = post_form(&self.client, &self.config.api_url, &params, ctx)
            .await
            .inspect_err(|e| warn!(incident = %key, error = %e, "SMS request failed"))?;

        if reply.status != StatusCode::OK {
            let body = reply.body_text();
            warn!(incident = %key, status = %reply.status, body = %body, "SMS provider returned error status");
            return Err(NotifyError::UnexpectedStatus {
                status: reply.status.as_u16(),
                body: Some(body),
            });
        }

        let body = reply.body.map_err(NotifyError::BodyRead)?;
        debug!(response = %String::from_utf8_lossy(&body), incident = %key, "SMS provider response");

        let response: SmsResponse = serde_json::from_slice(&body)?;
        response.into_result()
    }

    fn name(&self) -> &'static str {
        "sms"
    }
}
