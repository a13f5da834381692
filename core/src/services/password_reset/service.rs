//! Main password reset service implementation

use std::sync::Arc;

use auth_shared::validation::{mask_email, normalize_email};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::password_reset::PasswordResetToken;
use crate::domain::entities::token::{generate_opaque_token, hash_token};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::{CredentialStore, ResetTokenRepository};
use crate::services::validation::validate_password;

use super::config::PasswordResetServiceConfig;
use super::traits::MailSender;
use super::types::ResetRequestOutcome;

/// Password reset service issuing and redeeming single-use reset tokens
pub struct PasswordResetService<C, R, M>
where
    C: CredentialStore,
    R: ResetTokenRepository,
    M: MailSender,
{
    /// Identity lookups and password updates
    store: Arc<C>,
    /// Reset token records, separate from refresh tokens
    tokens: Arc<R>,
    /// Outbound mail
    mailer: Arc<M>,
    config: PasswordResetServiceConfig,
}

impl<C, R, M> PasswordResetService<C, R, M>
where
    C: CredentialStore,
    R: ResetTokenRepository,
    M: MailSender,
{
    /// Create a new password reset service
    pub fn new(
        store: Arc<C>,
        tokens: Arc<R>,
        mailer: Arc<M>,
        config: PasswordResetServiceConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            mailer,
            config,
        }
    }

    /// Start a reset for the identity owning `email`
    ///
    /// This method:
    /// 1. Looks up the identity by normalized email
    /// 2. Invalidates any outstanding reset tokens of that identity
    /// 3. Stores the hash of a fresh random token
    /// 4. Mails a link carrying the raw token
    ///
    /// Unknown emails and mail failures are reported through the outcome,
    /// never as errors. Only storage failures are returned as `Err`.
    pub async fn request_reset(&self, email: &str) -> DomainResult<ResetRequestOutcome> {
        self.request_reset_at(email, Utc::now()).await
    }

    pub async fn request_reset_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<ResetRequestOutcome> {
        let email = normalize_email(email);
        let masked = mask_email(&email);

        let identity = match self.store.find_by_email(&email).await? {
            Some(identity) => identity,
            None => {
                info!(
                    event = "password_reset_unknown_email",
                    email = %masked,
                    "Password reset requested for unknown email"
                );
                return Ok(ResetRequestOutcome::UnknownEmail);
            }
        };

        let invalidated = self.tokens.invalidate_for_identity(identity.id).await?;
        if invalidated > 0 {
            debug!(
                event = "password_reset_tokens_invalidated",
                user_id = %identity.id,
                count = invalidated,
                "Invalidated outstanding reset tokens"
            );
        }

        let raw_token = generate_opaque_token();
        let record = PasswordResetToken::new(
            identity.id,
            hash_token(&raw_token),
            self.config.token_ttl,
            now,
        );
        let expires_at = record.expires_at;
        self.tokens.save(record).await?;

        let link = self.config.reset_link(&raw_token);
        let body = format!(
            "Click <a href=\"{}\">here</a> to reset your password.",
            link
        );

        match self
            .mailer
            .send(&identity.email, &self.config.email_subject, &body)
            .await
        {
            Ok(()) => {
                info!(
                    event = "password_reset_dispatched",
                    user_id = %identity.id,
                    email = %masked,
                    expires_at = %expires_at,
                    "Password reset email dispatched"
                );
                Ok(ResetRequestOutcome::Dispatched)
            }
            Err(e) => {
                warn!(
                    event = "password_reset_mail_failed",
                    user_id = %identity.id,
                    email = %masked,
                    error = %e,
                    "Password reset email could not be delivered"
                );
                Ok(ResetRequestOutcome::MailDeliveryFailed)
            }
        }
    }

    /// Redeem a reset token and set a new password
    ///
    /// The new password is checked first so a rejected password leaves the
    /// token usable. On success the token is consumed, other outstanding
    /// reset tokens are invalidated and the refresh token is revoked. If a
    /// storage step fails after the token was consumed, the consumption is
    /// released so the same token can be presented again.
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - Password changed
    /// * `Err(DomainError::Token(TokenError::InvalidOrExpiredResetToken))` -
    ///   Unknown, consumed or expired token
    /// * `Err(DomainError::ValidationErr(_))` - New password rejected
    pub async fn redeem(&self, token: &str, new_password: &str) -> DomainResult<Identity> {
        self.redeem_at(token, new_password, Utc::now()).await
    }

    pub async fn redeem_at(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Identity> {
        validate_password(new_password, &self.config.password_policy)?;

        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::InvalidOrExpiredResetToken.into());
        }

        let record = match self.tokens.consume(&hash_token(token), now).await? {
            Some(record) => record,
            None => {
                debug!(
                    event = "password_reset_rejected",
                    reason = "unknown_consumed_or_expired",
                    "Reset token rejected"
                );
                return Err(TokenError::InvalidOrExpiredResetToken.into());
            }
        };

        match self.complete_redemption(&record, new_password).await {
            Ok(Some(identity)) => {
                info!(
                    event = "password_reset_completed",
                    user_id = %identity.id,
                    "Password reset completed"
                );
                Ok(identity)
            }
            Ok(None) => {
                warn!(
                    event = "password_reset_rejected",
                    reason = "identity_missing",
                    user_id = %record.identity_id,
                    "Reset token belongs to a missing identity"
                );
                Err(TokenError::InvalidOrExpiredResetToken.into())
            }
            Err(e) => {
                error!(
                    event = "password_reset_failed",
                    user_id = %record.identity_id,
                    error = %e,
                    "Password reset failed after consuming token, releasing it"
                );
                if let Err(release_err) = self.tokens.release(&record, now).await {
                    error!(
                        event = "password_reset_release_failed",
                        user_id = %record.identity_id,
                        error = %release_err,
                        "Failed to release reset token"
                    );
                }
                Err(e)
            }
        }
    }

    /// Apply a consumed token: set the password and drop other sessions
    ///
    /// Returns `Ok(None)` when the identity no longer exists.
    async fn complete_redemption(
        &self,
        record: &PasswordResetToken,
        new_password: &str,
    ) -> DomainResult<Option<Identity>> {
        let Some(identity) = self.store.find_by_id(record.identity_id).await? else {
            return Ok(None);
        };

        self.store.update_password(identity.id, new_password).await?;
        self.tokens.invalidate_for_identity(identity.id).await?;
        self.store.clear_refresh_token(identity.id).await?;

        Ok(Some(identity))
    }

    pub fn config(&self) -> &PasswordResetServiceConfig {
        &self.config
    }
}
