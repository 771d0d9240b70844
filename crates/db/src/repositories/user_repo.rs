//! Repository for the `users` table.

use coursegate_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{Account, CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role_id, created_at, updated_at";

/// Account columns with the role name resolved.
const ACCOUNT_SELECT: &str = "SELECT u.id, u.username, u.password_hash, r.name AS role
                              FROM users u
                              JOIN roles r ON r.id = u.role_id";

/// User lookups for the auth endpoints.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Look up the account a login attempt names. Usernames are case-sensitive.
    pub async fn find_account_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("{ACCOUNT_SELECT} WHERE u.username = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Look up the account a refresh session belongs to.
    pub async fn find_account(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("{ACCOUNT_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
