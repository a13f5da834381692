//! Shared utilities and common types for the AuthService workspace
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Input validation helpers (usernames, emails, password policy)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, MailConfig, MailProvider, PasswordPolicy, PasswordResetConfig,
    RefreshTokenConfig,
};
pub use utils::validation;
