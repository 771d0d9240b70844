//! Repository for the `lessons` table.

use coursegate_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::{CreateLesson, Lesson};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, course_id, title, body, video_url, duration_sec, sort_order, \
                        is_published, created_at, updated_at";

/// Read access to course lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLesson) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons
                (course_id, title, body, video_url, duration_sec, sort_order, is_published)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(&input.body)
            .bind(&input.video_url)
            .bind(input.duration_sec)
            .bind(input.sort_order)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    /// All lessons of a course, published or not, in canonical order
    /// `(sort_order, id)`.
    ///
    /// Callers still pass the result through
    /// [`coursegate_core::sequencing::visible_sequence`], which owns the
    /// visibility rule and re-applies the same ordering.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE course_id = $1 ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Find a lesson by ID, published or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
