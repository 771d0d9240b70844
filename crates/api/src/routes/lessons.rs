//! Route definitions for the `/lessons` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// PUT  /{lesson_id}/progress   -> record_progress
/// POST /{lesson_id}/complete   -> complete_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{lesson_id}/progress", put(progress::record_progress))
        .route("/{lesson_id}/complete", post(progress::complete_lesson))
}
