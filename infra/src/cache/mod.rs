//! Cache module for Redis-backed storage
//!
//! Provides the Redis client with retry logic and the Redis implementation
//! of the password reset token repository.

pub mod redis_client;
pub mod reset_token_cache;

pub use redis_client::RedisClient;
pub use reset_token_cache::RedisResetTokenRepository;

// Re-export commonly used types
pub use auth_shared::config::CacheConfig;
