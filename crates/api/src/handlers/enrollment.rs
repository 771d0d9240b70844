//! Handler for starting an enrollment (order creation).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coursegate_core::enrollment::{validate_amount, EnrollmentStatus};
use coursegate_core::error::CoreError;
use coursegate_core::types::DbId;
use coursegate_db::models::order::Order;
use coursegate_db::repositories::{EnrollmentRepo, OrderRepo};

use super::access::find_visible_course;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/courses/{course_id}/enroll
///
/// Create a pending order for the course, or return the one already open.
/// Responds 201 when an order was created and 200 when an existing one is
/// returned. Does not grant access: the gate stays `PENDING_PAYMENT` until
/// the payment side marks the order paid.
pub async fn enroll(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Order>>)> {
    let viewer = user.viewer();
    let course = find_visible_course(&state.pool, &viewer, course_id).await?;

    let latest = EnrollmentRepo::find_latest(&state.pool, viewer.user_id, course_id).await?;
    if let Some(enrollment) = latest {
        if enrollment.status()? == EnrollmentStatus::Active {
            return Err(AppError::Core(CoreError::Conflict(
                "Already enrolled in this course".into(),
            )));
        }
    }

    validate_amount(course.price_cents)?;
    let outcome =
        OrderRepo::enroll(&state.pool, viewer.user_id, course_id, course.price_cents).await?;

    let status = if outcome.created {
        tracing::info!(
            user_id = viewer.user_id,
            course_id,
            order_id = outcome.order.id,
            "Enrollment order created"
        );
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(DataResponse { data: outcome.order })))
}
