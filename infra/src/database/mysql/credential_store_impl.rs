//! MySQL implementation of the CredentialStore trait.
//!
//! Identities, bcrypt password hashes and the single refresh token slot of
//! each identity live in the `identities` table. Refresh rotation is a
//! conditional `UPDATE` on the current token hash.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use auth_core::domain::entities::identity::{Identity, NewIdentity, Role};
use auth_core::domain::entities::token::StoredRefreshToken;
use auth_core::errors::{AuthError, DomainError};
use auth_core::repositories::CredentialStore;

use super::db_error;
use crate::security::PasswordHasher;

const IDENTITY_COLUMNS: &str = "id, username, email, role, created_at, updated_at";

/// MySQL implementation of CredentialStore
pub struct MySqlCredentialStore {
    /// Database connection pool
    pool: MySqlPool,
    /// bcrypt hasher for stored passwords
    hasher: PasswordHasher,
}

impl MySqlCredentialStore {
    /// Create a new MySQL credential store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `hasher` - Password hasher used on create, verify and update
    pub fn new(pool: MySqlPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Convert database row to Identity entity
    fn row_to_identity(row: &sqlx::mysql::MySqlRow) -> Result<Identity, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get id", e))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| db_error("Failed to get role", e))?;

        Ok(Identity {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid identity UUID: {}", e),
            })?,
            username: row
                .try_get("username")
                .map_err(|e| db_error("Failed to get username", e))?,
            email: row
                .try_get("email")
                .map_err(|e| db_error("Failed to get email", e))?,
            role: role.parse::<Role>().map_err(DomainError::internal)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| db_error("Failed to get updated_at", e))?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Identity>, DomainError> {
        let query = format!(
            "SELECT {} FROM identities WHERE {} = ? LIMIT 1",
            IDENTITY_COLUMNS, column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Database query failed", e))?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    /// Translate a unique-key violation on insert into the matching domain error
    fn map_insert_error(err: sqlx::Error) -> DomainError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let message = db_err.message();
                if message.contains("uq_identities_username") {
                    return AuthError::DuplicateUsername.into();
                }
                if message.contains("uq_identities_email") {
                    return AuthError::DuplicateEmail.into();
                }
            }
        }
        db_error("Failed to create identity", err)
    }
}

#[async_trait]
impl CredentialStore for MySqlCredentialStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>, DomainError> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
        self.find_one("email", email).await
    }

    async fn verify_password(&self, id: Uuid, password: &str) -> Result<bool, DomainError> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM identities WHERE id = ? LIMIT 1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to load password hash", e))?;

        let matches = match hash {
            Some(hash) => self.hasher.verify(password, &hash).await?,
            None => self.hasher.verify_missing(password).await?,
        };
        Ok(matches)
    }

    async fn create(&self, identity: NewIdentity, password: &str) -> Result<Identity, DomainError> {
        let password_hash = self.hasher.hash(password).await?;
        let created = Identity::new(identity.username, identity.email, identity.role);

        let query = r#"
            INSERT INTO identities (
                id, username, email, password_hash, role, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(created.id.to_string())
            .bind(&created.username)
            .bind(&created.email)
            .bind(&password_hash)
            .bind(created.role.as_str())
            .bind(created.created_at)
            .bind(created.updated_at)
            .execute(&self.pool)
            .await
            .map_err(Self::map_insert_error)?;

        Ok(created)
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), DomainError> {
        let password_hash = self.hasher.hash(password).await?;

        let result =
            sqlx::query("UPDATE identities SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(&password_hash)
                .bind(Utc::now())
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| db_error("Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("identity {}", id),
            });
        }
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        id: Uuid,
        token: StoredRefreshToken,
    ) -> Result<(), DomainError> {
        let query = r#"
            UPDATE identities
            SET refresh_token_hash = ?, refresh_token_expires_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save refresh token", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("identity {}", id),
            });
        }
        Ok(())
    }

    async fn load_refresh_token(
        &self,
        id: Uuid,
    ) -> Result<Option<StoredRefreshToken>, DomainError> {
        let query = r#"
            SELECT refresh_token_hash, refresh_token_expires_at
            FROM identities
            WHERE id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load refresh token", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token_hash: Option<String> = row
            .try_get("refresh_token_hash")
            .map_err(|e| db_error("Failed to get refresh_token_hash", e))?;
        let expires_at: Option<DateTime<Utc>> = row
            .try_get("refresh_token_expires_at")
            .map_err(|e| db_error("Failed to get refresh_token_expires_at", e))?;

        Ok(token_hash
            .zip(expires_at)
            .map(|(token_hash, expires_at)| StoredRefreshToken {
                token_hash,
                expires_at,
            }))
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        expected_hash: &str,
        token: StoredRefreshToken,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE identities
            SET refresh_token_hash = ?, refresh_token_expires_at = ?, updated_at = ?
            WHERE id = ? AND refresh_token_hash = ?
        "#;

        let result = sqlx::query(query)
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .bind(Utc::now())
            .bind(id.to_string())
            .bind(expected_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to rotate refresh token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), DomainError> {
        let query = r#"
            UPDATE identities
            SET refresh_token_hash = NULL, refresh_token_expires_at = NULL, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to clear refresh token", e))?;

        Ok(())
    }
}
