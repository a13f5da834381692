//! MySQL implementation of the ResetTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use auth_core::domain::entities::password_reset::PasswordResetToken;
use auth_core::errors::DomainError;
use auth_core::repositories::ResetTokenRepository;

use super::db_error;

/// MySQL implementation of ResetTokenRepository
///
/// Records are keyed by the SHA-256 hash of the raw token. Consumption is a
/// conditional `UPDATE` so only one caller can win it.
pub struct MySqlResetTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlResetTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<PasswordResetToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get id", e))?;
        let identity_id: String = row
            .try_get("identity_id")
            .map_err(|e| db_error("Failed to get identity_id", e))?;

        Ok(PasswordResetToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            identity_id: Uuid::parse_str(&identity_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid identity UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| db_error("Failed to get token_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| db_error("Failed to get expires_at", e))?,
            consumed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("consumed_at")
                .map_err(|e| db_error("Failed to get consumed_at", e))?,
        })
    }
}

#[async_trait]
impl ResetTokenRepository for MySqlResetTokenRepository {
    async fn save(&self, token: PasswordResetToken) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO password_reset_tokens (
                id, identity_id, token_hash, created_at, expires_at, consumed_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.identity_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.consumed_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save reset token", e))?;

        Ok(())
    }

    async fn consume(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, DomainError> {
        let claim = r#"
            UPDATE password_reset_tokens
            SET consumed_at = ?
            WHERE token_hash = ? AND consumed_at IS NULL AND expires_at > ?
        "#;

        let result = sqlx::query(claim)
            .bind(now)
            .bind(token_hash)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to consume reset token", e))?;

        if result.rows_affected() != 1 {
            return Ok(None);
        }

        let query = r#"
            SELECT id, identity_id, token_hash, created_at, expires_at, consumed_at
            FROM password_reset_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load consumed reset token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn release(
        &self,
        token: &PasswordResetToken,
        _now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let Some(consumed_at) = token.consumed_at else {
            return Ok(());
        };

        sqlx::query(
            "UPDATE password_reset_tokens SET consumed_at = NULL WHERE token_hash = ? AND consumed_at = ?",
        )
        .bind(&token.token_hash)
        .bind(consumed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to release reset token", e))?;

        Ok(())
    }

    async fn invalidate_for_identity(&self, identity_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE identity_id = ? AND consumed_at IS NULL",
        )
        .bind(identity_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to invalidate reset tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete expired reset tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
