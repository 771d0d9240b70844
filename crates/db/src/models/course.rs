//! Course entity model.

use coursegate_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub is_published: bool,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a course. Catalog authoring lives elsewhere; this is
/// used for seeding and fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub slug: String,
    pub title: String,
    pub is_published: bool,
    pub price_cents: i64,
}
