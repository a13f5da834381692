//! In-memory implementation of the ResetTokenRepository trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use auth_core::domain::entities::password_reset::PasswordResetToken;
use auth_core::errors::DomainError;
use auth_core::repositories::ResetTokenRepository;

/// Reset token records keyed by token hash
#[derive(Default)]
pub struct InMemoryResetTokenStore {
    tokens: RwLock<HashMap<String, PasswordResetToken>>,
}

impl InMemoryResetTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, consumed ones included
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl ResetTokenRepository for InMemoryResetTokenStore {
    async fn save(&self, token: PasswordResetToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.token_hash.clone(), token);
        Ok(())
    }

    async fn consume(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, DomainError> {
        let mut tokens = self.tokens.write().await;
        let Some(token) = tokens.get_mut(token_hash) else {
            return Ok(None);
        };
        if !token.is_redeemable_at(now) {
            return Ok(None);
        }
        token.consume(now);
        Ok(Some(token.clone()))
    }

    async fn release(
        &self,
        token: &PasswordResetToken,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;
        let Some(stored) = tokens.get_mut(&token.token_hash) else {
            return Ok(());
        };
        if stored.consumed_at.is_some() && stored.consumed_at == token.consumed_at {
            stored.consumed_at = None;
        }
        Ok(())
    }

    async fn invalidate_for_identity(&self, identity_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.identity_id != identity_id || t.is_consumed());
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }
}
