use crate::template::TemplateError;
use thiserror::Error;

/// Error returned by a notifier when a dispatch does not succeed.
///
/// Every variant maps to exactly one retry decision, see [`NotifyError::is_retryable`].
/// Transient failures (network, HTTP status, unreadable or undecodable bodies) are
/// retryable; configuration bugs and provider rejections are not.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The dispatch context carried no usable group key
    #[error("group key error: {message}")]
    GroupKey { message: String },

    /// A configured template failed to render
    #[error("failed to render {field}: {source}")]
    Template {
        field: &'static str,
        #[source]
        source: TemplateError,
    },

    /// The request could not be sent; embedded URL credentials are already redacted
    #[error(transparent)]
    Transport(reqwest::Error),

    /// The dispatch context was cancelled while the request was in flight
    #[error("notification cancelled")]
    Cancelled,

    /// The provider answered with a status other than 200
    #[error("unexpected status code {status}{}", body_suffix(.body))]
    UnexpectedStatus { status: u16, body: Option<String> },

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// The response body was not the JSON document the provider documents
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider accepted the request but reported a failure
    #[error("{message}")]
    Provider { message: String },
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(", response body: {body}"),
        None => String::new(),
    }
}

impl NotifyError {
    /// Whether the host should schedule the alert batch again
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::GroupKey { .. }
            | NotifyError::Template { .. }
            | NotifyError::Provider { .. } => false,
            NotifyError::Transport(_)
            | NotifyError::Cancelled
            | NotifyError::UnexpectedStatus { .. }
            | NotifyError::BodyRead(_)
            | NotifyError::Decode(_) => true,
        }
    }
}

/// Type alias for Result with NotifyError to simplify function signatures
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Outcome handed back to the host retry scheduler.
///
/// When `error` is `None` the dispatch is a success, whatever `retryable` says.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub retryable: bool,
    pub error: Option<NotifyError>,
}

impl DispatchOutcome {
    /// Successful dispatch
    pub fn success() -> Self {
        Self {
            retryable: false,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl From<NotifyResult<()>> for DispatchOutcome {
    fn from(result: NotifyResult<()>) -> Self {
        match result {
            Ok(()) => DispatchOutcome::success(),
            Err(error) => DispatchOutcome {
                retryable: error.is_retryable(),
                error: Some(error),
            },
        }
    }
}
