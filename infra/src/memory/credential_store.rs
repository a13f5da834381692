//! In-memory implementation of the CredentialStore trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use auth_core::domain::entities::identity::{Identity, NewIdentity};
use auth_core::domain::entities::token::StoredRefreshToken;
use auth_core::errors::{AuthError, DomainError};
use auth_core::repositories::CredentialStore;

use crate::security::PasswordHasher;

struct CredentialRecord {
    identity: Identity,
    password_hash: String,
    refresh_token: Option<StoredRefreshToken>,
}

/// Credential store keeping identities in a process-local map
///
/// Passwords are stored as bcrypt hashes exactly as in the MySQL store.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<Uuid, CredentialRecord>>,
    hasher: PasswordHasher,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a specific hasher (e.g. a low bcrypt cost in tests)
    pub fn with_hasher(hasher: PasswordHasher) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Number of stored identities
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    fn not_found(id: Uuid) -> DomainError {
        DomainError::NotFound {
            resource: format!("identity {}", id),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&id).map(|r| r.identity.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.identity.username == username)
            .map(|r| r.identity.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.identity.email == email)
            .map(|r| r.identity.clone()))
    }

    async fn verify_password(&self, id: Uuid, password: &str) -> Result<bool, DomainError> {
        // The lock is released before hashing
        let hash = {
            let records = self.records.read().await;
            records.get(&id).map(|r| r.password_hash.clone())
        };

        let matches = match hash {
            Some(hash) => self.hasher.verify(password, &hash).await?,
            None => self.hasher.verify_missing(password).await?,
        };
        Ok(matches)
    }

    async fn create(&self, identity: NewIdentity, password: &str) -> Result<Identity, DomainError> {
        let password_hash = self.hasher.hash(password).await?;

        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.identity.username == identity.username)
        {
            return Err(AuthError::DuplicateUsername.into());
        }
        if records.values().any(|r| r.identity.email == identity.email) {
            return Err(AuthError::DuplicateEmail.into());
        }

        let created = Identity::new(identity.username, identity.email, identity.role);
        records.insert(
            created.id,
            CredentialRecord {
                identity: created.clone(),
                password_hash,
                refresh_token: None,
            },
        );
        Ok(created)
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), DomainError> {
        let password_hash = self.hasher.hash(password).await?;

        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        record.password_hash = password_hash;
        record.identity.updated_at = Utc::now();
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        id: Uuid,
        token: StoredRefreshToken,
    ) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        record.refresh_token = Some(token);
        Ok(())
    }

    async fn load_refresh_token(
        &self,
        id: Uuid,
    ) -> Result<Option<StoredRefreshToken>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&id).and_then(|r| r.refresh_token.clone()))
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        token: StoredRefreshToken,
    ) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };

        let current_matches = record
            .refresh_token
            .as_ref()
            .is_some_and(|current| current.token_hash == expected_hash);
        if current_matches {
            record.refresh_token = Some(token);
        }
        Ok(current_matches)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            record.refresh_token = None;
        }
        Ok(())
    }
}
