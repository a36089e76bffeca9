//! Router errors.

use thiserror::Error;

/// Errors raised while parsing or compiling templates.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The template text is malformed.
    #[error("invalid URL template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The compiled pattern was rejected by the regex engine.
    #[error("failed to compile URL matcher: {0}")]
    Regex(#[from] regex::Error),
}

impl RouterError {
    pub(crate) fn invalid(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
