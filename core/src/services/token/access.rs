//! Access token issuance

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::identity::Identity;
use crate::domain::entities::token::Claims;
use crate::errors::TokenError;

use super::signer::Signer;

/// Builds short-lived signed access tokens carrying identity claims
#[derive(Debug, Clone)]
pub struct AccessTokenIssuer {
    signer: Arc<Signer>,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl AccessTokenIssuer {
    pub fn new(
        signer: Arc<Signer>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            signer,
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        }
    }

    /// Issues an access token valid from now
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues an access token valid from `now` for the configured TTL
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new_access_token(identity, &self.issuer, &self.audience, self.ttl, now);
        self.signer.sign(&claims)
    }

    /// Verifies an access token issued by this issuer
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.signer.verify(token)
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        self.signer.verify_at(token, now)
    }

    /// Lifetime in seconds, as reported in `TokenPair.access_expires_in`
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }
}
