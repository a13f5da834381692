//! Domain entities representing core business objects.

pub mod identity;
pub mod password_reset;
pub mod token;

// Re-export commonly used types
pub use identity::{Identity, NewIdentity, Role};
pub use password_reset::PasswordResetToken;
pub use token::{
    generate_opaque_token, hash_token, Claims, RefreshToken, StoredRefreshToken, TokenPair,
    OPAQUE_TOKEN_BYTES, TOKEN_TYPE_BEARER,
};
