//! Mock implementation of CredentialStore for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::{Identity, NewIdentity};
use crate::domain::entities::token::StoredRefreshToken;
use crate::errors::{AuthError, DomainError};

use super::r#trait::CredentialStore;

#[derive(Debug, Clone)]
struct Record {
    identity: Identity,
    password: String,
    refresh_token: Option<StoredRefreshToken>,
}

/// Mock credential store keeping plaintext passwords in memory
#[derive(Clone, Default)]
pub struct MockCredentialStore {
    records: Arc<RwLock<HashMap<Uuid, Record>>>,
    fail_writes: Arc<AtomicBool>,
    fail_next_password_update: Arc<AtomicBool>,
}

impl MockCredentialStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent refresh token write fail with an internal error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make the next `update_password` call fail with an internal error
    pub fn fail_next_password_update(&self) {
        self.fail_next_password_update.store(true, Ordering::SeqCst);
    }

    /// Current stored password of an identity
    pub async fn password_of(&self, id: Uuid) -> Option<String> {
        self.records.read().await.get(&id).map(|r| r.password.clone())
    }

    /// Overwrite the stored refresh token record directly
    pub async fn set_refresh_token(&self, id: Uuid, token: StoredRefreshToken) {
        if let Some(record) = self.records.write().await.get_mut(&id) {
            record.refresh_token = Some(token);
        }
    }

    fn check_writes(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock store write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
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
        let records = self.records.read().await;
        Ok(records.get(&id).map_or(false, |r| r.password == password))
    }

    async fn create(
        &self,
        identity: NewIdentity,
        password: &str,
    ) -> Result<Identity, DomainError> {
        let mut records = self.records.write().await;

        if records.values().any(|r| r.identity.username == identity.username) {
            return Err(AuthError::DuplicateUsername.into());
        }
        if records.values().any(|r| r.identity.email == identity.email) {
            return Err(AuthError::DuplicateEmail.into());
        }

        let created = Identity::new(identity.username, identity.email, identity.role);
        records.insert(
            created.id,
            Record {
                identity: created.clone(),
                password: password.to_string(),
                refresh_token: None,
            },
        );
        Ok(created)
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), DomainError> {
        if self.fail_next_password_update.swap(false, Ordering::SeqCst) {
            return Err(DomainError::internal("mock store password update failure"));
        }
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("identity {}", id),
        })?;
        record.password = password.to_string();
        record.identity.updated_at = Utc::now();
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        id: Uuid,
        token: StoredRefreshToken,
    ) -> Result<(), DomainError> {
        self.check_writes()?;
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("identity {}", id),
        })?;
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
        self.check_writes()?;
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record)
                if record
                    .refresh_token
                    .as_ref()
                    .map_or(false, |t| t.token_hash == expected_hash) =>
            {
                record.refresh_token = Some(token);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            record.refresh_token = None;
        }
        Ok(())
    }
}
