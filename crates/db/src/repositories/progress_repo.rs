//! Repository for the `lesson_progress` table.
//!
//! Every write is a single `INSERT .. ON CONFLICT DO UPDATE`, so a row is
//! never partially written and concurrent writers cannot regress a
//! completed lesson.

use std::collections::HashSet;

use coursegate_core::progress::{
    ProgressUpdate, MAX_PERCENT, PROGRESS_COMPLETED, PROGRESS_IN_PROGRESS,
};
use coursegate_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::LessonProgress;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, lesson_id, status, percent, last_position_sec, \
                        completed_at, created_at, updated_at";

/// Provides per-(user, lesson) progress storage.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Find the progress row for a lesson. `None` means not started.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonProgress>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(pool)
            .await
    }

    /// All of a user's progress rows for lessons in a course.
    pub async fn list_for_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<LessonProgress>, sqlx::Error> {
        sqlx::query_as::<_, LessonProgress>(
            "SELECT lp.id, lp.user_id, lp.lesson_id, lp.status, lp.percent,
                    lp.last_position_sec, lp.completed_at, lp.created_at, lp.updated_at
             FROM lesson_progress lp
             JOIN lessons l ON l.id = lp.lesson_id
             WHERE lp.user_id = $1 AND l.course_id = $2
             ORDER BY lp.lesson_id",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Ids of the lessons in a course the user has completed.
    pub async fn completed_lesson_ids(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<HashSet<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT lp.lesson_id FROM lesson_progress lp
             JOIN lessons l ON l.id = lp.lesson_id
             WHERE lp.user_id = $1 AND l.course_id = $2 AND lp.status = $3",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(PROGRESS_COMPLETED)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Record a progress heartbeat.
    ///
    /// Creates the row on first write. Moves status to `in_progress` unless
    /// it is already `completed`, in which case status and percent are left
    /// alone and only the resume position is updated.
    pub async fn record(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
        update: &ProgressUpdate,
    ) -> Result<LessonProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (user_id, lesson_id, status, percent, last_position_sec)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 0))
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                status = CASE WHEN lesson_progress.status = $6
                              THEN lesson_progress.status ELSE EXCLUDED.status END,
                percent = CASE WHEN lesson_progress.status = $6
                               THEN lesson_progress.percent
                               ELSE COALESCE($4, lesson_progress.percent) END,
                last_position_sec = COALESCE($5, lesson_progress.last_position_sec)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(PROGRESS_IN_PROGRESS)
            .bind(update.percent)
            .bind(update.position_sec)
            .bind(PROGRESS_COMPLETED)
            .fetch_one(pool)
            .await
    }

    /// Mark a lesson completed. Idempotent: repeating it only refreshes
    /// `completed_at`.
    pub async fn complete(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<LessonProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_progress (user_id, lesson_id, status, percent, completed_at)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET
                status = EXCLUDED.status,
                percent = EXCLUDED.percent,
                completed_at = EXCLUDED.completed_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LessonProgress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .bind(PROGRESS_COMPLETED)
            .bind(MAX_PERCENT)
            .fetch_one(pool)
            .await
    }

    /// Delete every progress row the user has in a course. Administrative.
    ///
    /// Returns the number of rows removed.
    pub async fn reset_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM lesson_progress lp
             USING lessons l
             WHERE lp.lesson_id = l.id AND lp.user_id = $1 AND l.course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
