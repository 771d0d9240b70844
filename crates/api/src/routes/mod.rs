pub mod admin;
pub mod auth;
pub mod courses;
pub mod health;
pub mod lessons;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /courses/{course_id}/gate                        gate state (optional auth)
/// /courses/{course_id}/lessons                     lesson list with locks
/// /courses/{course_id}/lessons/{lesson_id}         lesson detail (guarded)
/// /courses/{course_id}/progress                    completion summary
/// /courses/{course_id}/enroll                      create or return pending order
///
/// /lessons/{lesson_id}/progress                    record progress (PUT, guarded)
/// /lessons/{lesson_id}/complete                    mark completed (POST, guarded)
///
/// /admin/orders/{id}/mark-paid                     payment confirmed (admin)
/// /admin/orders/{id}/mark-failed                   payment failed (admin)
/// /admin/enrollments/{id}/cancel                   cancel enrollment (admin)
/// /admin/users/{user_id}/courses/{course_id}/progress  reset progress (DELETE, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/lessons", lessons::router())
        .nest("/admin", admin::router())
}
