//! Repository for the `courses` table.

use coursegate_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{Course, CreateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, is_published, price_cents, created_at, updated_at";

/// Read access to the course catalog.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (slug, title, is_published, price_cents)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(input.is_published)
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a course by ID, published or not. Visibility is decided by the caller.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
