//! Route definitions for the `/courses` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{enrollment, gate, lessons, progress};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET  /{course_id}/gate                  -> refresh_gate
/// GET  /{course_id}/lessons               -> list_lessons
/// GET  /{course_id}/lessons/{lesson_id}   -> get_lesson
/// GET  /{course_id}/progress              -> get_course_progress
/// POST /{course_id}/enroll                -> enroll
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{course_id}/gate", get(gate::refresh_gate))
        .route("/{course_id}/lessons", get(lessons::list_lessons))
        .route("/{course_id}/lessons/{lesson_id}", get(lessons::get_lesson))
        .route("/{course_id}/progress", get(progress::get_course_progress))
        .route("/{course_id}/enroll", post(enrollment::enroll))
}
