//! Authentication and token configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign access tokens
    pub secret: String,

    /// Algorithm for JWT signing (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            algorithm: default_algorithm(),
            issuer: String::from("auth-service"),
            audience: String::from("auth-service-api"),
            access_token_expiry: 900, // 15 minutes
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Refresh token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshTokenConfig {
    /// Refresh token expiry time in seconds
    pub expiry: i64,
}

impl Default for RefreshTokenConfig {
    fn default() -> Self {
        Self {
            expiry: 604800, // 7 days
        }
    }
}

impl RefreshTokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            expiry: env_or("REFRESH_TOKEN_EXPIRY", Self::default().expiry),
        }
    }

    /// Set refresh token expiry in days
    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.expiry = days * 86400;
        self
    }
}

/// Password reset configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordResetConfig {
    /// Reset token expiry time in seconds
    pub expiry: i64,

    /// Page the reset link points at; the token is appended as a query parameter
    pub reset_url: String,

    /// Subject line of the reset email
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            expiry: 3600, // 1 hour
            reset_url: String::from("http://localhost:3000/reset-password"),
            email_subject: default_email_subject(),
        }
    }
}

impl PasswordResetConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry: env_or("PASSWORD_RESET_EXPIRY", defaults.expiry),
            reset_url: std::env::var("PASSWORD_RESET_URL").unwrap_or(defaults.reset_url),
            email_subject: std::env::var("PASSWORD_RESET_SUBJECT")
                .unwrap_or(defaults.email_subject),
        }
    }
}

/// Password acceptance rules applied on registration and reset
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PasswordPolicy {
    /// Minimum password length in characters
    pub min_length: usize,

    /// Maximum password length in bytes (bcrypt ignores input past 72 bytes)
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 72,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh token configuration
    #[serde(default)]
    pub refresh: RefreshTokenConfig,

    /// Password reset configuration
    #[serde(default)]
    pub password_reset: PasswordResetConfig,

    /// Password policy
    #[serde(default)]
    pub password_policy: PasswordPolicy,

    /// Whether new identities may register
    #[serde(default = "default_allow_registration")]
    pub allow_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            refresh: RefreshTokenConfig::default(),
            password_reset: PasswordResetConfig::default(),
            password_policy: PasswordPolicy::default(),
            allow_registration: default_allow_registration(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let policy = PasswordPolicy::default();
        Self {
            jwt: JwtConfig::from_env(),
            refresh: RefreshTokenConfig::from_env(),
            password_reset: PasswordResetConfig::from_env(),
            password_policy: PasswordPolicy {
                min_length: env_or("PASSWORD_MIN_LENGTH", policy.min_length),
                ..policy
            },
            allow_registration: env_or("ALLOW_REGISTRATION", default_allow_registration()),
        }
    }
}

fn default_algorithm() -> String {
    String::from("HS512")
}

fn default_email_subject() -> String {
    String::from("Password Reset")
}

fn default_allow_registration() -> bool {
    true
}
