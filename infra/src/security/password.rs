//! bcrypt password hashing
//!
//! bcrypt is CPU-bound, so every hash and verify runs on the blocking
//! thread pool instead of an async worker.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::InfrastructureError;

/// Password hasher with a fixed bcrypt cost
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash verified against when the identity is unknown
    dummy_hash: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31)
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub async fn hash(&self, password: &str) -> Result<String, InfrastructureError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| InfrastructureError::General(format!("Hashing task failed: {}", e)))?
            .map_err(InfrastructureError::PasswordHash)
    }

    /// Verify a plaintext password against a stored bcrypt hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, InfrastructureError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| InfrastructureError::General(format!("Verify task failed: {}", e)))?
            .map_err(InfrastructureError::PasswordHash)
    }

    /// Spend the same time as a real verification and report a mismatch
    ///
    /// Used for unknown identities so lookups of missing and existing
    /// accounts cost the same.
    pub async fn verify_missing(&self, password: &str) -> Result<bool, InfrastructureError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash("missing-identity-placeholder"))
            .await?;
        let _ = self.verify(password, hash).await?;
        debug!("Password checked against placeholder hash");
        Ok(false)
    }
}
