//! Handlers for lesson progress and completion.

use axum::extract::{Path, State};
use axum::Json;
use coursegate_core::progress::{summarize, CourseProgress, ProgressUpdate};
use coursegate_core::sequencing::visible_sequence;
use coursegate_core::types::DbId;
use coursegate_db::models::progress::LessonProgress;
use coursegate_db::repositories::{LessonRepo, ProgressRepo};
use serde::Serialize;

use super::access::{authorize_lesson_by_id, find_visible_course};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /lessons/{lesson_id}/complete`.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub progress: LessonProgress,
    /// Where to go next; `null` at the end of the course.
    pub next_lesson_id: Option<DbId>,
}

/// PUT /api/v1/lessons/{lesson_id}/progress
///
/// Record a progress heartbeat. The caller must currently be allowed to open
/// the lesson.
pub async fn record_progress(
    user: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<ProgressUpdate>,
) -> AppResult<Json<DataResponse<LessonProgress>>> {
    input.validate()?;
    let viewer = user.viewer();
    authorize_lesson_by_id(&state.pool, &viewer, lesson_id).await?;

    let progress = ProgressRepo::record(&state.pool, viewer.user_id, lesson_id, &input).await?;

    Ok(Json(DataResponse { data: progress }))
}

/// POST /api/v1/lessons/{lesson_id}/complete
///
/// Mark a lesson completed. Idempotent. The next lesson's lock state changes
/// only on the caller's next read.
pub async fn complete_lesson(
    user: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompletionResponse>>> {
    let viewer = user.viewer();
    let (access, position) = authorize_lesson_by_id(&state.pool, &viewer, lesson_id).await?;

    let progress = ProgressRepo::complete(&state.pool, viewer.user_id, lesson_id).await?;

    tracing::info!(
        user_id = viewer.user_id,
        course_id = access.course.id,
        lesson_id,
        "Lesson completed"
    );

    Ok(Json(DataResponse {
        data: CompletionResponse {
            progress,
            next_lesson_id: position.next.lesson_id(),
        },
    }))
}

/// GET /api/v1/courses/{course_id}/progress
///
/// Completion summary over the caller's visible lessons.
pub async fn get_course_progress(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CourseProgress>>> {
    let viewer = user.viewer();
    find_visible_course(&state.pool, &viewer, course_id).await?;

    let lessons = visible_sequence(
        LessonRepo::list_by_course(&state.pool, course_id).await?,
        viewer.privileged,
    );
    let completed =
        ProgressRepo::completed_lesson_ids(&state.pool, viewer.user_id, course_id).await?;

    Ok(Json(DataResponse {
        data: summarize(&lessons, &completed),
    }))
}
