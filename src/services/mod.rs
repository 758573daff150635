//! Service layer.
//!
//! Notification dispatch is the only service this crate provides.

pub mod notifications;

pub use notifications::{DispatchContext, Notifier, NotifierRegistry};
