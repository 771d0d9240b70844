//! Route definitions for the `/admin` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the `admin` role.
///
/// ```text
/// POST   /orders/{id}/mark-paid                       -> mark_order_paid
/// POST   /orders/{id}/mark-failed                     -> mark_order_failed
/// POST   /enrollments/{id}/cancel                     -> cancel_enrollment
/// DELETE /users/{user_id}/courses/{course_id}/progress -> reset_course_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}/mark-paid", post(admin::mark_order_paid))
        .route("/orders/{id}/mark-failed", post(admin::mark_order_failed))
        .route("/enrollments/{id}/cancel", post(admin::cancel_enrollment))
        .route(
            "/users/{user_id}/courses/{course_id}/progress",
            delete(admin::reset_course_progress),
        )
}
