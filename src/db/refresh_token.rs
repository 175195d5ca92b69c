//! Refresh token repository for JWT authentication.

use super::DbPool;
use crate::{HubError, Result};

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const SQL_NOW: &str = "TO_CHAR(NOW(), 'YYYY-MM-DD HH24:MI:SS')";

/// Refresh token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    /// Token ID.
    pub id: i64,
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<String>,
}

/// New refresh token for creation.
pub struct NewRefreshToken {
    /// User ID.
    pub user_id: i64,
    /// Token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

/// Repository for refresh token operations.
pub struct RefreshTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> RefreshTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new refresh token.
    pub async fn create(&self, new_token: &NewRefreshToken) -> Result<RefreshToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_token.user_id)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| HubError::NotFound("refresh token".to_string()))
    }

    /// Get a refresh token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token, expires_at, created_at, revoked_at
             FROM refresh_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Get a refresh token by token string.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let result = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, user_id, token, expires_at, created_at, revoked_at
             FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Get a valid (not expired, not revoked) refresh token.
    pub async fn get_valid_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        let sql = format!(
            "SELECT id, user_id, token, expires_at, created_at, revoked_at
             FROM refresh_tokens
             WHERE token = $1
               AND revoked_at IS NULL
               AND expires_at > {}",
            SQL_NOW
        );
        let result = sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(token)
            .fetch_optional(self.pool)
            .await?;

        Ok(result)
    }

    /// Revoke a refresh token.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let sql = format!(
            "UPDATE refresh_tokens SET revoked_at = {} WHERE token = $1 AND revoked_at IS NULL",
            SQL_NOW
        );
        let result = sqlx::query(&sql).bind(token).execute(self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke all tokens for a user.
    pub async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64> {
        let sql = format!(
            "UPDATE refresh_tokens SET revoked_at = {} WHERE user_id = $1 AND revoked_at IS NULL",
            SQL_NOW
        );
        let result = sqlx::query(&sql).bind(user_id).execute(self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Delete expired and revoked tokens (cleanup).
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let sql = format!(
            "DELETE FROM refresh_tokens WHERE expires_at < {} OR revoked_at IS NOT NULL",
            SQL_NOW
        );
        let result = sqlx::query(&sql).execute(self.pool).await?;

        Ok(result.rows_affected())
    }
}
