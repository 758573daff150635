//! Outbound HTTP plumbing shared by all notifiers.

pub mod client;

pub use client::{build_http_client, redact_error, redact_url};
