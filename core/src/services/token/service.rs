//! Main token service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::{Claims, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::CredentialStore;

use super::access::AccessTokenIssuer;
use super::config::TokenServiceConfig;
use super::refresh::RefreshTokenManager;
use super::signer::Signer;

/// Service pairing access token issuance with refresh token management
pub struct TokenService<C: CredentialStore> {
    issuer: AccessTokenIssuer,
    refresh: RefreshTokenManager<C>,
}

impl<C: CredentialStore> TokenService<C> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Credential store holding refresh token state
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a configuration error if the key or
    /// lifetimes are rejected
    pub fn new(store: Arc<C>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let signer = Arc::new(Signer::from_config(&config)?);

        Ok(Self {
            issuer: AccessTokenIssuer::new(
                signer,
                config.issuer,
                config.audience,
                config.access_token_ttl,
            ),
            refresh: RefreshTokenManager::new(store, config.refresh_token_ttl),
        })
    }

    /// Generates a new token pair (access + refresh tokens) for an identity
    pub async fn generate_tokens(&self, identity: &Identity) -> Result<TokenPair, DomainError> {
        self.generate_tokens_at(identity, Utc::now()).await
    }

    pub async fn generate_tokens_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.issuer.issue_at(identity, now)?;
        let refresh_token = self.refresh.issue_at(identity.id, now).await?;

        Ok(self.pair(access_token, refresh_token.value))
    }

    /// Validates and rotates a refresh token, returning the identity and a new pair
    ///
    /// Claims in the new access token come from the current stored identity.
    pub async fn rotate_tokens(
        &self,
        identity_id: Uuid,
        refresh_token: &str,
    ) -> Result<(Identity, TokenPair), DomainError> {
        self.rotate_tokens_at(identity_id, refresh_token, Utc::now())
            .await
    }

    pub async fn rotate_tokens_at(
        &self,
        identity_id: Uuid,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(Identity, TokenPair), DomainError> {
        let (identity, next) = self
            .refresh
            .validate_and_rotate_at(identity_id, refresh_token, now)
            .await?;
        let access_token = self.issuer.issue_at(&identity, now)?;

        let pair = self.pair(access_token, next.value);
        Ok((identity, pair))
    }

    /// Verifies an access token and returns the claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.issuer.verify(token)
    }

    pub fn verify_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        self.issuer.verify_at(token, now)
    }

    /// Revokes the refresh token of an identity (logout, password reset)
    pub async fn revoke_tokens(&self, identity_id: Uuid) -> Result<(), DomainError> {
        self.refresh.revoke(identity_id).await
    }

    pub fn access_issuer(&self) -> &AccessTokenIssuer {
        &self.issuer
    }

    pub fn refresh_manager(&self) -> &RefreshTokenManager<C> {
        &self.refresh
    }

    fn pair(&self, access_token: String, refresh_token: String) -> TokenPair {
        TokenPair::new(
            access_token,
            refresh_token,
            self.issuer.ttl_seconds(),
            self.refresh.ttl_seconds(),
        )
    }
}
