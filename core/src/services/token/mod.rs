//! Token service module
//!
//! This module handles all token-related operations:
//! - HMAC JWT signing and verification (`Signer`)
//! - Access token issuance (`AccessTokenIssuer`)
//! - Opaque refresh token issuance and atomic rotation (`RefreshTokenManager`)
//! - Token pair generation (`TokenService`)

mod access;
mod config;
mod refresh;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use access::AccessTokenIssuer;
pub use config::{
    TokenServiceConfig, MAX_ACCESS_TOKEN_TTL_SECS, MAX_REFRESH_TOKEN_TTL_SECS,
    MIN_ACCESS_TOKEN_TTL_SECS, MIN_SECRET_BYTES,
};
pub(crate) use config::ttl_from_seconds;
pub use refresh::RefreshTokenManager;
pub use service::TokenService;
pub use signer::Signer;
