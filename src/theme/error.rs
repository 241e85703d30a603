//! Theme engine error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    /// Embedded template missing
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template parse or render failure
    #[error("Template error: {0}")]
    TemplateError(String),
}
