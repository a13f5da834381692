//! Mock implementation of ResetTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::password_reset::PasswordResetToken;
use crate::errors::DomainError;

use super::r#trait::ResetTokenRepository;

/// Mock reset token repository keyed by token hash
#[derive(Clone, Default)]
pub struct MockResetTokenRepository {
    tokens: Arc<RwLock<HashMap<String, PasswordResetToken>>>,
}

impl MockResetTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// All records belonging to an identity
    pub async fn tokens_for(&self, identity_id: Uuid) -> Vec<PasswordResetToken> {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.identity_id == identity_id)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl ResetTokenRepository for MockResetTokenRepository {
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
        match tokens.get_mut(token_hash) {
            Some(token) if token.is_redeemable_at(now) => {
                token.consume(now);
                Ok(Some(token.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release(
        &self,
        token: &PasswordResetToken,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;
        if let Some(stored) = tokens.get_mut(&token.token_hash) {
            if stored.consumed_at.is_some() && stored.consumed_at == token.consumed_at {
                stored.consumed_at = None;
            }
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
