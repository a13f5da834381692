//! # Auth Core
//!
//! Core business logic for the authentication service.
//! This crate contains the identity and token entities, the token protocol
//! (signing, access tokens, refresh rotation), the password reset workflow,
//! collaborator traits for storage and mail, and the error types shared
//! by the infrastructure layer.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Claims, Identity, NewIdentity, PasswordResetToken, Role, TokenPair};
pub use domain::value_objects::AuthResponse;
pub use errors::{
    AuthError, DomainError, DomainResult, ErrorResponse, MailError, TokenError, ValidationError,
};
pub use repositories::{CredentialStore, ResetTokenRepository};
pub use services::*;
