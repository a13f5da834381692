//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{
    AuthError, ErrorResponse, MailError, TokenError, ValidationError, UNAUTHENTICATED_CODE,
};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for an internal error with a message
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Shorthand for a configuration error with a message
    pub fn config(message: impl Into<String>) -> Self {
        DomainError::Config {
            message: message.into(),
        }
    }
}

/// Internal details stay in logs; clients get a generic message.
impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Auth(e) => e.into(),
            DomainError::Token(e) => e.into(),
            DomainError::Mail(e) => e.into(),
            DomainError::ValidationErr(e) => e.into(),
            DomainError::NotFound { resource } => {
                ErrorResponse::new("NOT_FOUND", format!("Resource not found: {}", resource))
            }
            DomainError::Config { .. } | DomainError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
