//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborator traits defined in `auth_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL credential store and reset token repository using SQLx
//! - **Cache**: Redis client and a Redis-backed reset token repository
//! - **Memory**: In-process stores for development and tests
//! - **Mail**: SMTP delivery via lettre and a recording mock
//! - **Security**: bcrypt password hashing off the async runtime
//! - **Telemetry**: `tracing-subscriber` initialization
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis reset token storage (default)

use auth_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and reset token storage
#[cfg(feature = "redis-cache")]
pub mod cache;

/// In-memory store implementations
pub mod memory;

/// Mail delivery implementations
pub mod mail;

/// Password hashing
pub mod security;

/// Tracing subscriber setup
pub mod telemetry;

/// Service wiring from configuration
pub mod bootstrap;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mail transport error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Config { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
