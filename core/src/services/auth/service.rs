//! Main authentication service implementation

use std::sync::Arc;

use auth_shared::validation::normalize_username;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::identity::{Identity, NewIdentity, Role};
use crate::domain::entities::token::Claims;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{CredentialStore, ResetTokenRepository};
use crate::services::password_reset::{MailSender, PasswordResetService, ResetRequestOutcome};
use crate::services::token::TokenService;
use crate::services::validation::validate_registration;

use super::config::AuthServiceConfig;

/// Authentication service for the complete account lifecycle
pub struct AuthService<C, R, M>
where
    C: CredentialStore,
    R: ResetTokenRepository,
    M: MailSender,
{
    /// Credential store for identity lookups and creation
    store: Arc<C>,
    /// Token service for access and refresh tokens
    token_service: Arc<TokenService<C>>,
    /// Password reset workflow
    password_reset: Arc<PasswordResetService<C, R, M>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<C, R, M> AuthService<C, R, M>
where
    C: CredentialStore,
    R: ResetTokenRepository,
    M: MailSender,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `store` - Credential store shared with the token and reset services
    /// * `token_service` - Service for JWT and refresh token management
    /// * `password_reset` - Service for the password reset workflow
    /// * `config` - Service configuration
    pub fn new(
        store: Arc<C>,
        token_service: Arc<TokenService<C>>,
        password_reset: Arc<PasswordResetService<C, R, M>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            store,
            token_service,
            password_reset,
            config,
        }
    }

    /// Register a new identity and sign it in
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Token pair for the new identity
    /// * `Err(DomainError::Auth(AuthError::DuplicateUsername))` - Username taken
    /// * `Err(DomainError::Auth(AuthError::DuplicateEmail))` - Email taken
    /// * `Err(DomainError::ValidationErr(_))` - Malformed input or weak password
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthResponse> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }

        let input = validate_registration(username, email, password, &self.config.password_policy)?;

        let identity = self
            .store
            .create(
                NewIdentity::new(input.username, input.email, self.config.default_role),
                password,
            )
            .await?;

        info!(
            event = "identity_registered",
            user_id = %identity.id,
            username = %identity.username,
            "New identity registered"
        );

        self.sign_in(&identity).await
    }

    /// Authenticate with username and password
    ///
    /// Unknown usernames and wrong passwords both return
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResponse> {
        let username = normalize_username(username);

        let identity = self.store.find_by_username(&username).await?;
        // The password is checked even for unknown users so both paths do the same work
        let lookup_id = identity.as_ref().map_or(Uuid::nil(), |i| i.id);
        let password_ok = self.store.verify_password(lookup_id, password).await?;

        let identity = match identity {
            Some(identity) if password_ok => identity,
            Some(identity) => {
                warn!(
                    event = "login_failed",
                    user_id = %identity.id,
                    reason = "wrong_password",
                    "Login failed"
                );
                return Err(AuthError::InvalidCredentials.into());
            }
            None => {
                warn!(event = "login_failed", reason = "unknown_user", "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        info!(event = "login_succeeded", user_id = %identity.id, "Login succeeded");
        self.sign_in(&identity).await
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// The presented token is invalidated; replaying it fails with
    /// `TokenError::InvalidRefreshToken`.
    pub async fn refresh(&self, user_id: Uuid, refresh_token: &str) -> DomainResult<AuthResponse> {
        let (identity, pair) = self
            .token_service
            .rotate_tokens(user_id, refresh_token)
            .await?;
        Ok(AuthResponse::from_token_pair(pair, &identity))
    }

    /// Verify an access token
    ///
    /// Every verification failure is reported as `AuthError::Unauthenticated`.
    pub fn authenticate(&self, access_token: &str) -> DomainResult<Claims> {
        self.token_service
            .verify_access_token(access_token)
            .map_err(|e| {
                debug!(event = "authentication_failed", reason = %e, "Access token rejected");
                AuthError::Unauthenticated.into()
            })
    }

    /// Verify an access token and require a role
    pub fn authorize(&self, access_token: &str, required: Role) -> DomainResult<Claims> {
        let claims = self.authenticate(access_token)?;
        if !claims.role.grants(required) {
            warn!(
                event = "authorization_denied",
                user_id = %claims.sub,
                role = %claims.role,
                required = %required,
                "Insufficient permissions"
            );
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(claims)
    }

    /// Revoke the refresh token of an identity
    ///
    /// Issued access tokens stay valid until they expire.
    pub async fn logout(&self, user_id: Uuid) -> DomainResult<()> {
        self.token_service.revoke_tokens(user_id).await?;
        info!(event = "logout", user_id = %user_id, "Identity logged out");
        Ok(())
    }

    /// Start a password reset
    ///
    /// Always succeeds so callers cannot tell whether the email is registered.
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        match self.password_reset.request_reset(email).await {
            Ok(ResetRequestOutcome::Dispatched) => {}
            Ok(outcome) => {
                debug!(event = "forgot_password", outcome = ?outcome, "Reset request not dispatched");
            }
            Err(e) => {
                error!(event = "forgot_password_failed", error = %e, "Password reset request failed");
            }
        }
        Ok(())
    }

    /// Complete a password reset with the emailed token
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<Identity> {
        self.password_reset.redeem(token, new_password).await
    }

    async fn sign_in(&self, identity: &Identity) -> Result<AuthResponse, DomainError> {
        let pair = self.token_service.generate_tokens(identity).await?;
        Ok(AuthResponse::from_token_pair(pair, identity))
    }
}
