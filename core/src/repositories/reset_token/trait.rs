//! Reset token repository trait for password reset token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::password_reset::PasswordResetToken;
use crate::errors::DomainError;

/// Repository trait for password reset tokens
///
/// Reset tokens live in their own namespace, apart from refresh tokens.
/// Records are looked up by the SHA-256 hash of the raw token.
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    /// Persist a new reset token record
    async fn save(&self, token: PasswordResetToken) -> Result<(), DomainError>;

    /// Atomically consume a token
    ///
    /// The record is marked consumed only if it exists, has not been consumed
    /// and has not expired at `now`. Of several concurrent callers presenting
    /// the same hash, at most one receives the record.
    ///
    /// # Returns
    /// * `Ok(Some(PasswordResetToken))` - The consumed record
    /// * `Ok(None)` - Unknown, already consumed or expired
    async fn consume(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, DomainError>;

    /// Undo a consumption returned by `consume`
    ///
    /// Clears `consumed_at` so the token can be redeemed again, if it has not
    /// expired at `now`. Only the consumption recorded in `token` is undone;
    /// a record consumed at a different instant or already removed is left
    /// alone.
    async fn release(
        &self,
        token: &PasswordResetToken,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Invalidate every outstanding token of an identity
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens invalidated
    async fn invalidate_for_identity(&self, identity_id: Uuid) -> Result<usize, DomainError>;

    /// Delete records that expired before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
