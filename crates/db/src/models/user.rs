//! User models for the stand-in identity store.

use coursegate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `users` table. Holds the password hash, so it is never
/// serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user joined with its role name: everything a token is minted from.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// DTO for inserting a user (seeding and fixtures).
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}
