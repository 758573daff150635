use thiserror::Error;

/// Errors raised while rendering a template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("{map} has no key '{key}'")]
    MissingKey { map: &'static str, key: String },

    #[error("unclosed action at byte {0}")]
    Unclosed(usize),

    /// Error reported by an external template engine
    #[error("{0}")]
    Engine(String),
}
