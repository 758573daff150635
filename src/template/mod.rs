//! Template collaborator boundary.
//!
//! Notifiers never interpret templates themselves: every configured field is
//! passed through a [`TemplateRenderer`] together with [`TemplateData`] derived
//! from the alert batch. Hosts plug in their own engine; [`PlaceholderRenderer`]
//! covers the simple `{{ Name }}` substitution case.

mod data;
mod error;
mod placeholder;

pub use data::TemplateData;
pub use error::TemplateError;
pub use placeholder::PlaceholderRenderer;

/// Renders a template string against alert-derived data
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, data: &TemplateData) -> Result<String, TemplateError>;
}
