mod alert;
mod secret;

pub use alert::{Alert, AlertStatus, LabelSet};
pub use secret::Secret;
