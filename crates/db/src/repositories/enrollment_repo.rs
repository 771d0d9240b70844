//! Repository for the `enrollments` table.

use coursegate_core::enrollment::{ENROLLMENT_CANCELLED, ENROLLMENT_PENDING};
use coursegate_core::types::DbId;
use sqlx::PgPool;

use super::OrderRepo;
use crate::models::enrollment::Enrollment;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, user_id, course_id, status, created_at, updated_at";

/// Read access to the enrollment ledger, plus administrative cancellation.
///
/// Activation happens only through [`super::OrderRepo::mark_paid`].
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Find an enrollment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The effective enrollment for a (user, course) pair: the most recent one.
    pub async fn find_latest(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments
             WHERE user_id = $1 AND course_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Cancel an enrollment that is not already cancelled.
    ///
    /// Returns `None` if the row does not exist or was already cancelled.
    /// Cancellation is final for the row; re-enrolling inserts a new one.
    /// Any order still awaiting payment for this enrollment is failed in the
    /// same transaction, so it cannot later be paid without granting access.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE enrollments SET status = $2
             WHERE id = $1 AND status <> $2
             RETURNING {COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(ENROLLMENT_CANCELLED)
            .fetch_optional(&mut *tx)
            .await?;

        if enrollment.is_some() {
            let failed = OrderRepo::fail_pending_for_enrollment(&mut *tx, id).await?;
            if failed > 0 {
                tracing::debug!(
                    enrollment_id = id,
                    failed,
                    "Failed open orders of cancelled enrollment"
                );
            }
        }

        tx.commit().await?;
        Ok(enrollment)
    }

    /// Insert a pending enrollment inside an existing transaction.
    pub(crate) async fn insert_pending(
        conn: &mut sqlx::PgConnection,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(ENROLLMENT_PENDING)
            .fetch_one(conn)
            .await
    }
}
