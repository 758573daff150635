//! Notifier registry built from settings.
//!
//! Builds the shared HTTP client once and one notifier per configured section,
//! then fans alert batches out to them.

use super::provider::{DispatchContext, Notifier};
use super::sms_provider::SmsNotifier;
use super::voice_call_provider::VoiceCallNotifier;
use crate::config::{ConfigError, Settings};
use crate::error::DispatchOutcome;
use crate::external::client::build_http_client;
use crate::models::Alert;
use crate::template::TemplateRenderer;
use std::sync::Arc;
use tracing::{info, warn};

/// Set of notifiers a receiver dispatches to
#[derive(Clone, Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every notifier configured in `settings`
    ///
    /// Settings are validated first; all notifiers share one HTTP client.
    pub fn from_settings(
        settings: &Settings,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let client = build_http_client(&settings.http)?;

        let mut registry = Self::new();
        if let Some(sms) = &settings.sms {
            registry.register(Arc::new(SmsNotifier::new(
                sms.clone(),
                renderer.clone(),
                client.clone(),
            )));
        }
        if let Some(voice_call) = &settings.voice_call {
            registry.register(Arc::new(VoiceCallNotifier::new(
                voice_call.clone(),
                renderer,
                client,
            )));
        }

        info!(notifiers = ?registry.names(), "notifiers configured");
        Ok(registry)
    }

    pub fn register(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn notifiers(&self) -> &[Arc<dyn Notifier>] {
        &self.notifiers
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Notifier>> {
        self.notifiers.iter().find(|n| n.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Dispatches the batch to each notifier in registration order
    ///
    /// One notifier failing does not stop the others; every outcome is returned.
    pub async fn dispatch_all(
        &self,
        ctx: &DispatchContext,
        alerts: &[Alert],
    ) -> Vec<(&'static str, DispatchOutcome)> {
        let mut outcomes = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let outcome = notifier.dispatch(ctx, alerts).await;
            if let Some(error) = &outcome.error {
                warn!(
                    notifier = notifier.name(),
                    retryable = outcome.retryable,
                    error = %error,
                    "notification failed"
                );
            }
            outcomes.push((notifier.name(), outcome));
        }
        outcomes
    }
}
