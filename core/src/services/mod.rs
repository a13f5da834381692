//! Business services containing domain logic and use cases.

pub mod auth;
pub mod password_reset;
pub mod token;
pub mod validation;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use password_reset::{
    CleanupResult, MailSender, PasswordResetService, PasswordResetServiceConfig,
    ResetRequestOutcome, ResetTokenCleanupConfig, ResetTokenCleanupService,
};
pub use token::{AccessTokenIssuer, RefreshTokenManager, Signer, TokenService, TokenServiceConfig};
