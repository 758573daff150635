//! Alert notifiers with pluggable providers.
//!
//! The core trait `Notifier` is the one capability the host sees; the SMS and
//! voice-call providers implement it against the Yunpian HTTP API.

mod provider;
mod registry;
mod sms_provider;
mod voice_call_provider;

#[cfg(test)]
mod test_support;

pub use provider::{DispatchContext, Notifier};
pub use registry::NotifierRegistry;
pub use sms_provider::{SmsNotifier, SmsResponse, SEND_SMS_URL};
pub use voice_call_provider::{VoiceCallNotifier, VoiceCallResponse, SEND_CALL_URL};
