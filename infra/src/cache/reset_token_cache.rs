//! Redis-backed password reset token repository
//!
//! Key patterns:
//! - `password_reset:token:{hash}` - JSON record, expires with the token
//! - `password_reset:identity:{id}` - Set of outstanding token hashes
//!
//! Redis expiry removes stale records, so `delete_expired` has nothing to do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use auth_core::domain::entities::password_reset::PasswordResetToken;
use auth_core::errors::DomainError;
use auth_core::repositories::ResetTokenRepository;

use crate::cache::RedisClient;

const TOKEN_KEY_PREFIX: &str = "password_reset:token";
const IDENTITY_KEY_PREFIX: &str = "password_reset:identity";

/// Reset token repository storing records in Redis
#[derive(Clone)]
pub struct RedisResetTokenRepository {
    redis_client: RedisClient,
}

impl RedisResetTokenRepository {
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    fn token_key(&self, token_hash: &str) -> String {
        self.redis_client.key(&format_token_key(token_hash))
    }

    fn identity_key(&self, identity_id: Uuid) -> String {
        self.redis_client.key(&format_identity_key(identity_id))
    }
}

pub(crate) fn format_token_key(token_hash: &str) -> String {
    format!("{}:{}", TOKEN_KEY_PREFIX, token_hash)
}

pub(crate) fn format_identity_key(identity_id: Uuid) -> String {
    format!("{}:{}", IDENTITY_KEY_PREFIX, identity_id)
}

/// Seconds the record should live in Redis, at least one
pub(crate) fn ttl_seconds(token: &PasswordResetToken, now: DateTime<Utc>) -> u64 {
    token.remaining_seconds(now).max(1) as u64
}

#[async_trait]
impl ResetTokenRepository for RedisResetTokenRepository {
    async fn save(&self, token: PasswordResetToken) -> Result<(), DomainError> {
        let ttl = ttl_seconds(&token, Utc::now());
        let payload = serde_json::to_string(&token).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize reset token: {}", e),
        })?;

        self.redis_client
            .set_with_expiry(&self.token_key(&token.token_hash), &payload, ttl)
            .await?;
        self.redis_client
            .set_add(&self.identity_key(token.identity_id), &token.token_hash, ttl)
            .await?;

        debug!(
            event = "reset_token_cached",
            user_id = %token.identity_id,
            ttl_seconds = ttl,
            "Reset token stored"
        );
        Ok(())
    }

    async fn consume(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, DomainError> {
        let Some(payload) = self.redis_client.get_del(&self.token_key(token_hash)).await? else {
            return Ok(None);
        };

        let mut token: PasswordResetToken =
            serde_json::from_str(&payload).map_err(|e| DomainError::Internal {
                message: format!("Corrupt reset token record: {}", e),
            })?;

        if let Err(e) = self
            .redis_client
            .set_remove(&self.identity_key(token.identity_id), token_hash)
            .await
        {
            warn!(error = %e, "Failed to drop consumed token from identity index");
        }

        if !token.is_redeemable_at(now) {
            return Ok(None);
        }
        token.consume(now);
        Ok(Some(token))
    }

    async fn release(
        &self,
        token: &PasswordResetToken,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if token.is_expired_at(now) {
            return Ok(());
        }

        let mut restored = token.clone();
        restored.consumed_at = None;
        self.save(restored).await?;

        debug!(
            event = "reset_token_released",
            user_id = %token.identity_id,
            "Reset token restored after failed redemption"
        );
        Ok(())
    }

    async fn invalidate_for_identity(&self, identity_id: Uuid) -> Result<usize, DomainError> {
        let identity_key = self.identity_key(identity_id);
        let hashes = self.redis_client.set_members(&identity_key).await?;

        let token_keys: Vec<String> = hashes.iter().map(|h| self.token_key(h)).collect();
        let removed = self.redis_client.delete(&token_keys).await?;
        self.redis_client.delete(&[identity_key]).await?;

        Ok(removed)
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        Ok(0)
    }
}
