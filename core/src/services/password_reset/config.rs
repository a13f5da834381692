//! Configuration for the password reset service

use auth_shared::config::{PasswordPolicy, PasswordResetConfig};
use chrono::Duration;
use url::Url;

use crate::errors::DomainError;
use crate::services::token::ttl_from_seconds;

/// Longest reset token lifetime accepted, in seconds
pub const MAX_RESET_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Configuration for the password reset service
#[derive(Debug, Clone)]
pub struct PasswordResetServiceConfig {
    /// Lifetime of a reset token
    pub token_ttl: Duration,
    /// Page the emailed link points at
    pub reset_url: Url,
    /// Subject line of the reset email
    pub email_subject: String,
    /// Rules applied to the new password before a token is consumed
    pub password_policy: PasswordPolicy,
}

impl PasswordResetServiceConfig {
    /// Default lifetime, subject and policy around a given reset page
    pub fn new(reset_url: Url) -> Self {
        let defaults = PasswordResetConfig::default();
        Self {
            token_ttl: Duration::seconds(defaults.expiry),
            reset_url,
            email_subject: defaults.email_subject,
            password_policy: PasswordPolicy::default(),
        }
    }

    /// Build and validate from the shared configuration
    pub fn from_config(
        config: &PasswordResetConfig,
        password_policy: PasswordPolicy,
    ) -> Result<Self, DomainError> {
        let reset_url = Url::parse(&config.reset_url).map_err(|e| {
            DomainError::config(format!("Invalid password reset URL {}: {}", config.reset_url, e))
        })?;
        if !matches!(reset_url.scheme(), "http" | "https") {
            return Err(DomainError::config(format!(
                "Password reset URL must be http or https: {}",
                config.reset_url
            )));
        }
        if !(1..=MAX_RESET_TOKEN_TTL_SECS).contains(&config.expiry) {
            return Err(DomainError::config(format!(
                "Password reset expiry must be between 1 and {} seconds, got {}",
                MAX_RESET_TOKEN_TTL_SECS, config.expiry
            )));
        }

        Ok(Self {
            token_ttl: ttl_from_seconds(config.expiry, "PASSWORD_RESET_EXPIRY")?,
            reset_url,
            email_subject: config.email_subject.clone(),
            password_policy,
        })
    }

    /// Reset link carrying the raw token as a `token` query parameter
    pub fn reset_link(&self, token: &str) -> Url {
        let mut link = self.reset_url.clone();
        link.query_pairs_mut().append_pair("token", token);
        link
    }
}
