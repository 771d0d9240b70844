//! Repository for the `refresh_sessions` table.

use coursegate_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session::RefreshSession;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, revoked_at, created_at";

/// Single-use refresh token storage.
pub struct SessionRepo;

impl SessionRepo {
    /// Record a newly issued refresh token.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_sessions (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshSession>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Spend a refresh token: revoke it and return its session.
    ///
    /// Returns `None` if the token is unknown, expired, or already spent.
    /// Check and revoke happen in one statement, so two concurrent refreshes
    /// with the same token cannot both succeed.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshSession>, sqlx::Error> {
        let query = format!(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke every live session of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
