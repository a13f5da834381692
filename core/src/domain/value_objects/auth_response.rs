//! Authentication response value object returned by register, login and refresh.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::identity::{Identity, Role};
use crate::domain::entities::token::TokenPair;

/// Authentication response containing tokens and a summary of the identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Opaque refresh token for obtaining new token pairs
    pub refresh_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Refresh token expiration time in seconds
    pub refresh_expires_in: i64,

    /// Authenticated identity
    pub user_id: Uuid,

    pub username: String,

    pub role: Role,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and the identity it was minted for
    pub fn from_token_pair(token_pair: TokenPair, identity: &Identity) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            token_type: token_pair.token_type,
            expires_in: token_pair.access_expires_in,
            refresh_expires_in: token_pair.refresh_expires_in,
            user_id: identity.id,
            username: identity.username.clone(),
            role: identity.role,
        }
    }
}
