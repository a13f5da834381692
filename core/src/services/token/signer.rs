//! HMAC JWT signing and verification

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

use super::config::{is_hmac, TokenServiceConfig, MIN_SECRET_BYTES};

/// Signs and verifies compact JWTs with a process-wide HMAC key.
///
/// Expiry is checked against a caller-supplied clock rather than inside
/// `jsonwebtoken`, so `verify_at` gives deterministic results.
pub struct Signer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Signer {
    /// Creates a signer for one HMAC key
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Config)` - Non-HMAC algorithm or secret shorter than 32 bytes
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        issuer: &str,
        audience: &str,
    ) -> Result<Self, DomainError> {
        if !is_hmac(algorithm) {
            return Err(DomainError::config(format!(
                "Unsupported JWT algorithm: {:?}",
                algorithm
            )));
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(DomainError::config(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Creates a signer from the token service configuration
    pub fn from_config(config: &TokenServiceConfig) -> Result<Self, DomainError> {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.algorithm,
            &config.issuer,
            &config.audience,
        )
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encodes claims into a signed JWT
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verifies a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature, issuer and audience, then expiry against `now`
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Authentic and unexpired
    /// * `Err(TokenError::Expired)` - Authentic but `now` is past `exp`
    /// * `Err(TokenError::InvalidSignature)` - Anything else
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(
                    event = "token_rejected",
                    reason = ?e.kind(),
                    "Access token failed verification"
                );
                TokenError::InvalidSignature
            })?
            .claims;

        if claims.nbf > now.timestamp() {
            debug!(
                event = "token_rejected",
                reason = "not_yet_valid",
                "Access token used before its nbf"
            );
            return Err(TokenError::InvalidSignature);
        }

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
