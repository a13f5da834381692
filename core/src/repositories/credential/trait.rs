//! Credential store trait: identity persistence, password hashing and the
//! refresh token slot of each identity.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::{Identity, NewIdentity};
use crate::domain::entities::token::StoredRefreshToken;
use crate::errors::DomainError;

/// Persistence contract for identities and their credentials
///
/// The store owns password hashes and the single refresh token record of
/// each identity. The core never sees either in plaintext form, except the
/// candidate password it forwards for verification.
///
/// # Security Considerations
/// - Only the SHA-256 hash of a refresh token is ever passed in
/// - Usernames and emails must be unique; `create` reports which one collided
/// - `replace_refresh_token` must be a single atomic compare-and-swap
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an identity by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by normalized (lowercase) email
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError>;

    /// Check a candidate password against the stored hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password matches
    /// * `Ok(false)` - Password does not match or the identity does not exist
    async fn verify_password(&self, id: Uuid, password: &str) -> Result<bool, DomainError>;

    /// Create a new identity, hashing `password` for storage
    ///
    /// # Returns
    /// * `Ok(Identity)` - The created identity
    /// * `Err(DomainError::Auth(AuthError::DuplicateUsername))` - Username taken
    /// * `Err(DomainError::Auth(AuthError::DuplicateEmail))` - Email taken
    async fn create(&self, identity: NewIdentity, password: &str)
        -> Result<Identity, DomainError>;

    /// Replace the password hash of an identity
    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), DomainError>;

    /// Store a refresh token record, overwriting any previous one
    async fn save_refresh_token(
        &self,
        id: Uuid,
        token: StoredRefreshToken,
    ) -> Result<(), DomainError>;

    /// Load the current refresh token record of an identity
    async fn load_refresh_token(&self, id: Uuid)
        -> Result<Option<StoredRefreshToken>, DomainError>;

    /// Atomically swap the refresh token record if the stored hash still equals
    /// `expected_hash`
    ///
    /// # Returns
    /// * `Ok(true)` - The swap happened
    /// * `Ok(false)` - The stored token changed or was cleared in the meantime
    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        token: StoredRefreshToken,
    ) -> Result<bool, DomainError>;

    /// Remove the refresh token record of an identity
    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), DomainError>;
}
