//! Core notifier trait and the plumbing shared by the providers.
//!
//! Every provider turns an alert batch into one form POST and classifies the
//! reply. The pieces common to all of them live here: the per-call
//! [`DispatchContext`], template field rendering, and the cancellable
//! request/response exchange.

use crate::error::{DispatchOutcome, NotifyError, NotifyResult};
use crate::external::client::redact_error;
use crate::models::{Alert, LabelSet};
use crate::template::{TemplateData, TemplateRenderer};
use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

/// Per-call context supplied by the host
///
/// Carries the correlation group key, the receiver name and a cancellation
/// token. Cancelling the token aborts an in-flight request.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    receiver: String,
    group_key: Option<String>,
    group_labels: LabelSet,
    cancellation: CancellationToken,
}

impl DispatchContext {
    pub fn new(receiver: impl Into<String>, group_key: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            group_key: Some(group_key.into()),
            ..Default::default()
        }
    }

    /// Context without a group key; dispatching with it fails fast
    pub fn without_group_key(receiver: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            ..Default::default()
        }
    }

    pub fn with_group_labels(mut self, group_labels: LabelSet) -> Self {
        self.group_labels = group_labels;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Correlation key of the alert group
    ///
    /// # Errors
    /// `NotifyError::GroupKey` if the key is absent or blank
    pub fn group_key(&self) -> NotifyResult<&str> {
        match self.group_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            Some(_) => Err(NotifyError::GroupKey {
                message: "group key is blank".to_string(),
            }),
            None => Err(NotifyError::GroupKey {
                message: "group key missing from context".to_string(),
            }),
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Template data for a batch dispatched under this context
    pub fn template_data(&self, group_key: &str, alerts: &[Alert]) -> TemplateData {
        TemplateData::from_alerts(&self.receiver, group_key, alerts)
            .with_group_labels(self.group_labels.clone())
    }
}

/// A notification channel the host can dispatch alert batches to
///
/// All notifiers must be Send + Sync; one instance serves concurrent calls.
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl Notifier for PagerNotifier {
///     async fn notify(&self, ctx: &DispatchContext, alerts: &[Alert]) -> NotifyResult<()> {
///         // Implementation here
///     }
///
///     fn name(&self) -> &'static str {
///         "pager"
///     }
/// }
/// ```
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one alert batch
    ///
    /// # Returns
    /// `Ok(())` on delivery; otherwise an error whose `is_retryable` tells the
    /// host whether to schedule the batch again
    async fn notify(&self, ctx: &DispatchContext, alerts: &[Alert]) -> NotifyResult<()>;

    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Delivers one alert batch and reports the `(retryable, error)` pair
    async fn dispatch(&self, ctx: &DispatchContext, alerts: &[Alert]) -> DispatchOutcome {
        self.notify(ctx, alerts).await.into()
    }
}

/// Renders configured fields, tagging failures with the field name
pub(super) struct FieldRenderer<'a> {
    renderer: &'a dyn TemplateRenderer,
    data: &'a TemplateData,
}

impl<'a> FieldRenderer<'a> {
    pub(super) fn new(renderer: &'a dyn TemplateRenderer, data: &'a TemplateData) -> Self {
        Self { renderer, data }
    }

    pub(super) fn render(&self, field: &'static str, template: &str) -> NotifyResult<String> {
        self.renderer
            .render(template, self.data)
            .map_err(|source| NotifyError::Template { field, source })
    }
}

/// Status line and fully read body of a provider reply
pub(super) struct ProviderReply {
    pub(super) status: StatusCode,
    pub(super) body: Result<Vec<u8>, reqwest::Error>,
}

impl ProviderReply {
    pub(super) fn body_text(&self) -> String {
        match &self.body {
            Ok(body) => String::from_utf8_lossy(body).into_owned(),
            Err(_) => String::new(),
        }
    }
}

/// POSTs `params` form-encoded to `url`
///
/// The body is always read to the end, whatever the status, so the connection
/// returns to the shared pool. Cancellation of the context drops the request.
pub(super) async fn post_form(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, String)],
    ctx: &DispatchContext,
) -> NotifyResult<ProviderReply> {
    let exchange = async {
        let response = client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(redact_error(e)))?;

        let status = response.status();
        let body = response.bytes().await.map(|b| b.to_vec());
        Ok::<_, NotifyError>(ProviderReply { status, body })
    };

    tokio::select! {
        biased;
        _ = ctx.cancellation().cancelled() => Err(NotifyError::Cancelled),
        reply = exchange => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{PlaceholderRenderer, TemplateError};

    #[test]
    fn test_group_key_present() {
        let ctx = DispatchContext::new("ops", "{}:{alertname=\"Down\"}");
        assert_eq!(ctx.group_key().unwrap(), "{}:{alertname=\"Down\"}");
    }

    #[test]
    fn test_group_key_missing() {
        let ctx = DispatchContext::without_group_key("ops");
        let err = ctx.group_key().unwrap_err();
        assert!(matches!(err, NotifyError::GroupKey { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_group_key_blank() {
        let ctx = DispatchContext::new("ops", "  ");
        assert!(matches!(
            ctx.group_key().unwrap_err(),
            NotifyError::GroupKey { .. }
        ));
    }

    #[test]
    fn test_template_data_carries_context() {
        let mut group = LabelSet::new();
        group.insert("team".to_string(), "infra".to_string());
        let ctx = DispatchContext::new("ops", "k").with_group_labels(group);

        let data = ctx.template_data("k", &[]);
        assert_eq!(data.receiver, "ops");
        assert_eq!(data.group_labels["team"], "infra");
    }

    #[test]
    fn test_field_renderer_tags_field() {
        let data = TemplateData::from_alerts("ops", "k", &[]);
        let fields = FieldRenderer::new(&PlaceholderRenderer, &data);

        assert_eq!(fields.render("mobile", "{{ Receiver }}").unwrap(), "ops");
        match fields.render("text", "{{ Bogus }}") {
            Err(NotifyError::Template { field, source }) => {
                assert_eq!(field, "text");
                assert_eq!(source, TemplateError::UnknownField("Bogus".to_string()));
            }
            other => panic!("Expected template error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_form_cancelled_before_send() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = DispatchContext::new("ops", "k").with_cancellation(token);
        let client = reqwest::Client::new();

        let result = post_form(&client, "http://127.0.0.1:1/", &[], &ctx).await;
        assert!(matches!(result, Err(NotifyError::Cancelled)));
    }
}
