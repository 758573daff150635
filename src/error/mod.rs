mod notify_error;

pub use notify_error::{DispatchOutcome, NotifyError, NotifyResult};
