//! Configuration for the token service

use std::str::FromStr;

use auth_shared::config::AuthConfig;
use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Shortest HMAC secret accepted, in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// Shortest access token lifetime accepted, in seconds
pub const MIN_ACCESS_TOKEN_TTL_SECS: i64 = 5 * 60;

/// Longest access token lifetime accepted, in seconds
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest refresh token lifetime accepted, in seconds
pub const MAX_REFRESH_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Value of the `iss` claim
    pub issuer: String,
    /// Value of the `aud` claim
    pub audience: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS512,
            issuer: "auth-service".to_string(),
            audience: "auth-service-api".to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
        }
    }
}

impl TokenServiceConfig {
    /// Build and validate from the shared authentication configuration
    pub fn from_auth_config(config: &AuthConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.jwt.algorithm).map_err(|_| {
            DomainError::config(format!("Unknown JWT algorithm: {}", config.jwt.algorithm))
        })?;

        let token_config = Self {
            jwt_secret: config.jwt.secret.clone(),
            algorithm,
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
            access_token_ttl: ttl_from_seconds(
                config.jwt.access_token_expiry,
                "JWT_ACCESS_TOKEN_EXPIRY",
            )?,
            refresh_token_ttl: ttl_from_seconds(config.refresh.expiry, "REFRESH_TOKEN_EXPIRY")?,
        };
        token_config.validate()?;
        Ok(token_config)
    }

    /// Check the signing and lifetime settings
    pub fn validate(&self) -> Result<(), DomainError> {
        if !is_hmac(self.algorithm) {
            return Err(DomainError::config(format!(
                "Unsupported JWT algorithm {:?}: only HS256, HS384 and HS512 are accepted",
                self.algorithm
            )));
        }

        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(DomainError::config(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        let access_secs = self.access_token_ttl.num_seconds();
        if !(MIN_ACCESS_TOKEN_TTL_SECS..=MAX_ACCESS_TOKEN_TTL_SECS).contains(&access_secs) {
            return Err(DomainError::config(format!(
                "Access token expiry must be between {} and {} seconds, got {}",
                MIN_ACCESS_TOKEN_TTL_SECS, MAX_ACCESS_TOKEN_TTL_SECS, access_secs
            )));
        }

        if self.refresh_token_ttl <= self.access_token_ttl {
            return Err(DomainError::config(
                "Refresh token expiry must be longer than access token expiry",
            ));
        }

        if self.refresh_token_ttl.num_seconds() > MAX_REFRESH_TOKEN_TTL_SECS {
            return Err(DomainError::config(format!(
                "Refresh token expiry must be at most {} seconds",
                MAX_REFRESH_TOKEN_TTL_SECS
            )));
        }

        if self.issuer.is_empty() || self.audience.is_empty() {
            return Err(DomainError::config("JWT issuer and audience must be set"));
        }

        Ok(())
    }
}

/// Convert a configured lifetime in seconds, rejecting out of range values
pub(crate) fn ttl_from_seconds(seconds: i64, name: &str) -> Result<Duration, DomainError> {
    Duration::try_seconds(seconds)
        .ok_or_else(|| DomainError::config(format!("{} is out of range: {}", name, seconds)))
}

pub(crate) fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
