//! Password reset token record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use password reset token as stored by the reset token repository.
///
/// Only the hash of the token is kept; the raw value travels in the email link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Identity the token was issued for
    pub identity_id: Uuid,

    /// SHA-256 hex digest of the raw token
    pub token_hash: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was redeemed
    pub consumed_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
    /// Creates a new unconsumed record valid for `ttl` from `now`
    pub fn new(identity_id: Uuid, token_hash: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity_id,
            token_hash,
            created_at: now,
            expires_at: now + ttl,
            consumed_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Whether the token may still be redeemed at `now`
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed() && !self.is_expired_at(now)
    }

    /// Marks the token as consumed
    pub fn consume(&mut self, now: DateTime<Utc>) {
        self.consumed_at = Some(now);
    }

    /// Seconds left before expiry, zero when already expired
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
