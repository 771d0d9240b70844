//! Refresh session model.

use coursegate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `refresh_sessions` table. Only the SHA-256 of the token
/// is stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
