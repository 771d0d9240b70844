//! Administrative handlers standing in for the payment service and support
//! tooling. All require the `admin` role.

use axum::extract::{Path, State};
use axum::Json;
use coursegate_core::error::CoreError;
use coursegate_core::types::DbId;
use coursegate_db::models::enrollment::Enrollment;
use coursegate_db::models::order::Order;
use coursegate_db::repositories::{EnrollmentRepo, OrderRepo, ProgressRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for the progress reset endpoint.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub deleted: u64,
}

/// Turn a settlement result into the order or the reason it did not settle.
///
/// A missing order is 404; an order that is no longer pending is 409.
async fn require_settled(
    state: &AppState,
    order_id: DbId,
    settled: Option<Order>,
) -> AppResult<Order> {
    if let Some(order) = settled {
        return Ok(order);
    }
    match OrderRepo::find_by_id(&state.pool, order_id).await? {
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id: order_id,
        })),
        Some(order) => Err(AppError::Core(CoreError::Conflict(format!(
            "Order {order_id} is already {}",
            order.status
        )))),
    }
}

/// POST /api/v1/admin/orders/{id}/mark-paid
///
/// Confirm payment: the order becomes paid and its enrollment active.
pub async fn mark_order_paid(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Order>>> {
    let settled = OrderRepo::mark_paid(&state.pool, order_id).await?;
    let order = require_settled(&state, order_id, settled).await?;

    tracing::info!(
        admin_id = admin.user_id,
        order_id,
        user_id = order.user_id,
        course_id = order.course_id,
        "Order marked paid"
    );
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/admin/orders/{id}/mark-failed
///
/// Record a failed payment. The enrollment stays pending; the gate falls
/// back to `NO_ENROLLMENT` and the learner may enroll again.
pub async fn mark_order_failed(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Order>>> {
    let settled = OrderRepo::mark_failed(&state.pool, order_id).await?;
    let order = require_settled(&state, order_id, settled).await?;

    tracing::info!(
        admin_id = admin.user_id,
        order_id,
        user_id = order.user_id,
        course_id = order.course_id,
        "Order marked failed"
    );
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/admin/enrollments/{id}/cancel
pub async fn cancel_enrollment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(enrollment_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Enrollment>>> {
    let Some(enrollment) = EnrollmentRepo::cancel(&state.pool, enrollment_id).await? else {
        return match EnrollmentRepo::find_by_id(&state.pool, enrollment_id).await? {
            None => Err(AppError::Core(CoreError::NotFound {
                entity: "Enrollment",
                id: enrollment_id,
            })),
            Some(_) => Err(AppError::Core(CoreError::Conflict(format!(
                "Enrollment {enrollment_id} is already cancelled"
            )))),
        };
    };

    tracing::info!(
        admin_id = admin.user_id,
        enrollment_id,
        user_id = enrollment.user_id,
        course_id = enrollment.course_id,
        "Enrollment cancelled"
    );
    Ok(Json(DataResponse { data: enrollment }))
}

/// DELETE /api/v1/admin/users/{user_id}/courses/{course_id}/progress
///
/// Remove every progress row the user has in the course.
pub async fn reset_course_progress(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<ResetResponse>>> {
    let deleted = ProgressRepo::reset_course(&state.pool, user_id, course_id).await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id,
        course_id,
        deleted,
        "Course progress reset"
    );
    Ok(Json(DataResponse {
        data: ResetResponse { deleted },
    }))
}
