//! Yunpian Notifier Library
//!
//! SMS and voice-call notifiers for an alerting host. Each dispatch renders the
//! configured fields, issues one form POST to the provider and classifies the
//! reply into success, retryable failure or terminal failure.

pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;
pub mod template;

pub use error::{DispatchOutcome, NotifyError, NotifyResult};
pub use services::notifications::{
    DispatchContext, Notifier, NotifierRegistry, SmsNotifier, VoiceCallNotifier,
};

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
