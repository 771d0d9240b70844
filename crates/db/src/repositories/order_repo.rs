//! Repository for the `orders` table.
//!
//! Order creation is the only path that writes a pending enrollment, and
//! payment settlement is the only path that activates one.

use coursegate_core::enrollment::{
    ENROLLMENT_ACTIVE, ENROLLMENT_PENDING, ORDER_FAILED, ORDER_PAID, ORDER_PENDING,
};
use coursegate_core::types::DbId;
use sqlx::PgPool;

use super::enrollment_repo::{self, EnrollmentRepo};
use crate::models::enrollment::Enrollment;
use crate::models::order::Order;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, course_id, enrollment_id, status, amount_cents, created_at, updated_at";

/// Result of [`OrderRepo::enroll`].
#[derive(Debug, Clone)]
pub struct EnrollOutcome {
    pub order: Order,
    /// `false` when an existing pending order was returned.
    pub created: bool,
}

/// Provides order creation, lookup, and settlement.
pub struct OrderRepo;

impl OrderRepo {
    /// Find an order by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent order for a (user, course) pair.
    pub async fn find_latest(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1 AND course_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// The open order for a (user, course) pair, if any.
    ///
    /// Only a pending order whose enrollment is still pending counts as open;
    /// an order left behind by a cancelled enrollment can never be paid into
    /// access.
    pub async fn find_pending(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "SELECT o.id, o.user_id, o.course_id, o.enrollment_id, o.status, o.amount_cents,
                    o.created_at, o.updated_at
             FROM orders o
             JOIN enrollments e ON e.id = o.enrollment_id
             WHERE o.user_id = $1 AND o.course_id = $2 AND o.status = $3 AND e.status = $4",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(ORDER_PENDING)
        .bind(ENROLLMENT_PENDING)
        .fetch_optional(pool)
        .await
    }

    /// Create a pending order for the pair, or return the one already open.
    ///
    /// A pending enrollment is reused when the latest enrollment is still
    /// pending; otherwise a new one is inserted, so a cancelled enrollment is
    /// never resurrected. Does not grant access.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        amount_cents: i64,
    ) -> Result<EnrollOutcome, sqlx::Error> {
        if let Some(order) = Self::find_pending(pool, user_id, course_id).await? {
            return Ok(EnrollOutcome {
                order,
                created: false,
            });
        }

        let mut tx = pool.begin().await?;

        // A pending order tied to a non-pending enrollment would otherwise
        // hold the one-pending-order slot forever.
        let retired = sqlx::query(
            "UPDATE orders SET status = $3
             WHERE user_id = $1 AND course_id = $2 AND status = $4
               AND NOT EXISTS (
                   SELECT 1 FROM enrollments e
                   WHERE e.id = orders.enrollment_id AND e.status = $5
               )",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(ORDER_FAILED)
        .bind(ORDER_PENDING)
        .bind(ENROLLMENT_PENDING)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if retired > 0 {
            tracing::warn!(user_id, course_id, retired, "Retired orphaned pending orders");
        }

        let latest_query = format!(
            "SELECT {} FROM enrollments
             WHERE user_id = $1 AND course_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            enrollment_repo::COLUMNS
        );
        let latest = sqlx::query_as::<_, Enrollment>(&latest_query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?;

        let enrollment = match latest {
            Some(e) if e.status == ENROLLMENT_PENDING => e,
            _ => EnrollmentRepo::insert_pending(&mut *tx, user_id, course_id).await?,
        };

        let insert_query = format!(
            "INSERT INTO orders (user_id, course_id, enrollment_id, status, amount_cents)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, course_id) WHERE status = 'pending' DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Order>(&insert_query)
            .bind(user_id)
            .bind(course_id)
            .bind(enrollment.id)
            .bind(ORDER_PENDING)
            .bind(amount_cents)
            .fetch_optional(&mut *tx)
            .await?;

        match inserted {
            Some(order) => {
                tx.commit().await?;
                Ok(EnrollOutcome {
                    order,
                    created: true,
                })
            }
            None => {
                // A concurrent enroll won the race; discard our enrollment row.
                tx.rollback().await?;
                tracing::debug!(user_id, course_id, "Concurrent enroll, returning open order");
                let order = Self::find_pending(pool, user_id, course_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(EnrollOutcome {
                    order,
                    created: false,
                })
            }
        }
    }

    /// Settle a pending order as paid and activate its enrollment.
    ///
    /// Stands in for the external payment service. Returns `None` if the
    /// order does not exist or is not pending.
    pub async fn mark_paid(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE orders SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(ORDER_PAID)
            .bind(ORDER_PENDING)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(enrollment_id) = order.as_ref().and_then(|o| o.enrollment_id) {
            sqlx::query("UPDATE enrollments SET status = $2 WHERE id = $1 AND status = $3")
                .bind(enrollment_id)
                .bind(ENROLLMENT_ACTIVE)
                .bind(ENROLLMENT_PENDING)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Fail every pending order of one enrollment inside an existing
    /// transaction.
    pub(crate) async fn fail_pending_for_enrollment(
        conn: &mut sqlx::PgConnection,
        enrollment_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2 WHERE enrollment_id = $1 AND status = $3",
        )
        .bind(enrollment_id)
        .bind(ORDER_FAILED)
        .bind(ORDER_PENDING)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Settle a pending order as failed. The enrollment stays pending.
    ///
    /// Returns `None` if the order does not exist or is not pending.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(ORDER_FAILED)
            .bind(ORDER_PENDING)
            .fetch_optional(pool)
            .await
    }
}
