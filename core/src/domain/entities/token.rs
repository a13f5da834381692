//! Token entities for JWT access tokens and opaque refresh tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::identity::{Identity, Role};

/// Number of random bytes behind every opaque token (256 bits)
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Token type advertised to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,

    /// Username at issue time
    pub name: String,

    /// Role at issue time
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates access token claims for an identity, valid from `now` for `ttl`
    pub fn new_access_token(
        identity: &Identity,
        issuer: &str,
        audience: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: identity.id.to_string(),
            name: identity.username.clone(),
            role: identity.role,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// A token is expired once `now` is past `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    /// Gets the identity ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Opaque refresh token handed to the client.
///
/// The raw value only lives here and in the client; stores keep its hash.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Generates a fresh random refresh token expiring `ttl` after `now`
    pub fn generate(ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            value: generate_opaque_token(),
            expires_at: now + ttl,
        }
    }

    /// Record persisted by the credential store for this token
    pub fn to_stored(&self) -> StoredRefreshToken {
        StoredRefreshToken {
            token_hash: hash_token(&self.value),
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Refresh token state stored against an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRefreshToken {
    /// SHA-256 hex digest of the token value
    pub token_hash: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl StoredRefreshToken {
    /// A stored token is unusable once `now` reaches its expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            access_expires_in,
            refresh_expires_in,
        }
    }
}

/// 32 bytes from the OS CSPRNG, base64url without padding
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; OPAQUE_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hashes a token for secure storage
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
