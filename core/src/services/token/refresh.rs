//! Opaque refresh token issuance, validation and rotation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{hash_token, RefreshToken};
use crate::errors::{DomainError, TokenError};
use crate::repositories::CredentialStore;

/// Generates refresh tokens, persists their hashes and rotates them
pub struct RefreshTokenManager<C: CredentialStore> {
    store: Arc<C>,
    ttl: Duration,
}

impl<C: CredentialStore> RefreshTokenManager<C> {
    pub fn new(store: Arc<C>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Issues a refresh token for an identity, replacing any previous one
    pub async fn issue(&self, identity_id: Uuid) -> Result<RefreshToken, DomainError> {
        self.issue_at(identity_id, Utc::now()).await
    }

    /// Issues a refresh token expiring one refresh window after `now`
    ///
    /// The token is only returned once its hash has been persisted.
    pub async fn issue_at(
        &self,
        identity_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, DomainError> {
        let token = RefreshToken::generate(self.ttl, now);
        self.store
            .save_refresh_token(identity_id, token.to_stored())
            .await?;

        debug!(
            event = "refresh_token_issued",
            user_id = %identity_id,
            expires_at = %token.expires_at,
            "Refresh token issued"
        );
        Ok(token)
    }

    /// Validates the presented token and atomically rotates it
    pub async fn validate_and_rotate(
        &self,
        identity_id: Uuid,
        presented: &str,
    ) -> Result<(Identity, RefreshToken), DomainError> {
        self.validate_and_rotate_at(identity_id, presented, Utc::now())
            .await
    }

    /// Validates `presented` against the stored record at `now` and swaps in
    /// a new token.
    ///
    /// Every failure cause returns `TokenError::InvalidRefreshToken`; the
    /// cause itself is only logged. When two callers race with the same
    /// token, the store's compare-and-swap lets exactly one of them win.
    pub async fn validate_and_rotate_at(
        &self,
        identity_id: Uuid,
        presented: &str,
        now: DateTime<Utc>,
    ) -> Result<(Identity, RefreshToken), DomainError> {
        let identity = match self.store.find_by_id(identity_id).await? {
            Some(identity) => identity,
            None => return Err(reject(identity_id, "unknown_identity")),
        };

        let stored = match self.store.load_refresh_token(identity_id).await? {
            Some(stored) => stored,
            None => return Err(reject(identity_id, "no_stored_token")),
        };

        let presented_hash = hash_token(presented);
        if !constant_time_eq(presented_hash.as_bytes(), stored.token_hash.as_bytes()) {
            return Err(reject(identity_id, "hash_mismatch"));
        }

        if stored.is_expired_at(now) {
            return Err(reject(identity_id, "expired"));
        }

        let next = RefreshToken::generate(self.ttl, now);
        let swapped = self
            .store
            .replace_refresh_token(identity_id, &stored.token_hash, next.to_stored())
            .await?;
        if !swapped {
            return Err(reject(identity_id, "concurrent_rotation"));
        }

        info!(
            event = "refresh_token_rotated",
            user_id = %identity_id,
            "Refresh token rotated"
        );
        Ok((identity, next))
    }

    /// Clears the stored refresh token of an identity
    pub async fn revoke(&self, identity_id: Uuid) -> Result<(), DomainError> {
        self.store.clear_refresh_token(identity_id).await?;
        debug!(event = "refresh_token_revoked", user_id = %identity_id, "Refresh token revoked");
        Ok(())
    }

    /// Lifetime in seconds, as reported in `TokenPair.refresh_expires_in`
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

fn reject(identity_id: Uuid, reason: &'static str) -> DomainError {
    debug!(
        event = "refresh_token_rejected",
        user_id = %identity_id,
        reason,
        "Refresh token rejected"
    );
    TokenError::InvalidRefreshToken.into()
}
