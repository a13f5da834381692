//! Domain-specific error types for authentication and related operations
//!
//! This module provides error type definitions for authentication, token
//! management, mail delivery and validation, together with the
//! `ErrorResponse` shape a transport boundary hands to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Registration is currently disabled")]
    RegistrationDisabled,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or expired password reset token")]
    InvalidOrExpiredResetToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Outbound mail errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("Mail delivery failed: {message}")]
    Delivery { message: String },

    #[error("Invalid mail address: {address}")]
    InvalidAddress { address: String },
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password rejected: {reason}")]
    WeakPassword { reason: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}

/// Unified error response structure for transport boundaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

/// Code shared by every access token failure
pub const UNAUTHENTICATED_CODE: &str = "UNAUTHENTICATED";

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a single detail to the error response
    pub fn with_detail(mut self, key: impl ToString, value: serde_json::Value) -> Self {
        let mut details = self.details.unwrap_or_default();
        details.insert(key.to_string(), value);
        self.details = Some(details);
        self
    }

    fn unauthenticated() -> Self {
        ErrorResponse::new(UNAUTHENTICATED_CODE, AuthError::Unauthenticated)
    }
}

/// Convert AuthError to ErrorResponse
impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let error_code = match &err {
            AuthError::DuplicateUsername => "DUPLICATE_USERNAME",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthenticated => return ErrorResponse::unauthenticated(),
            AuthError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            AuthError::RegistrationDisabled => "REGISTRATION_DISABLED",
        };

        ErrorResponse::new(error_code, err)
    }
}

/// Convert TokenError to ErrorResponse
///
/// Expired and tampered access tokens share one code and message.
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        let error_code = match &err {
            TokenError::InvalidSignature | TokenError::Expired => {
                return ErrorResponse::unauthenticated()
            }
            TokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            TokenError::InvalidOrExpiredResetToken => "INVALID_OR_EXPIRED_RESET_TOKEN",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        };

        ErrorResponse::new(error_code, err)
    }
}

/// Convert MailError to ErrorResponse
impl From<MailError> for ErrorResponse {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Delivery { .. } => {
                ErrorResponse::new("MAIL_DELIVERY_FAILED", "Mail delivery failed")
            }
            MailError::InvalidAddress { .. } => ErrorResponse::new("INVALID_ADDRESS", err),
        }
    }
}

/// Convert ValidationError to ErrorResponse
impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        let error_code = match &err {
            ValidationError::RequiredField { .. } => "REQUIRED_FIELD",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::InvalidUsername => "INVALID_USERNAME",
            ValidationError::InvalidEmail => "INVALID_EMAIL",
            ValidationError::WeakPassword { .. } => "WEAK_PASSWORD",
            ValidationError::OutOfRange { .. } => "OUT_OF_RANGE",
        };

        ErrorResponse::new(error_code, err)
    }
}
