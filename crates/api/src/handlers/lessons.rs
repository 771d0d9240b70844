//! Handlers for the lesson list and single-lesson detail.

use axum::extract::{Path, State};
use axum::Json;
use coursegate_core::sequencing::{resolve_locks, LockState};
use coursegate_core::types::{DbId, Timestamp};
use coursegate_db::models::lesson::Lesson;
use coursegate_db::models::progress::LessonProgress;
use serde::Serialize;

use super::access::load_course_access;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One row of the lesson list. Content fields are omitted; they are only
/// served by the detail endpoint after the guard passes.
#[derive(Debug, Serialize)]
pub struct LessonListItem {
    pub id: DbId,
    pub title: String,
    pub sort_order: i32,
    pub duration_sec: Option<i32>,
    pub is_published: bool,
    #[serde(flatten)]
    pub lock: LockState,
    pub progress: Option<ProgressSnapshot>,
}

/// The caller's progress on one lesson, or `null` when not started.
#[derive(Debug, Serialize)]
pub struct ProgressSnapshot {
    pub status: String,
    pub percent: i16,
    pub last_position_sec: i32,
    pub completed_at: Option<Timestamp>,
}

impl From<&LessonProgress> for ProgressSnapshot {
    fn from(p: &LessonProgress) -> Self {
        Self {
            status: p.status.clone(),
            percent: p.percent,
            last_position_sec: p.last_position_sec,
            completed_at: p.completed_at,
        }
    }
}

/// Full lesson content plus its neighbours in the visible sequence.
#[derive(Debug, Serialize)]
pub struct LessonDetail {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub position: usize,
    pub previous_lesson_id: Option<DbId>,
    /// `null` on the last lesson.
    pub next_lesson_id: Option<DbId>,
    pub progress: Option<ProgressSnapshot>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/courses/{course_id}/lessons
///
/// The caller's visible lessons in order, each annotated with lock state.
/// Lock flags here are informational; the detail endpoint re-derives them.
pub async fn list_lessons(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LessonListItem>>>> {
    let viewer = user.viewer();
    let access = load_course_access(&state.pool, &viewer, course_id).await?;

    let locks = resolve_locks(&access.lessons, access.gate.access(), &access.completed());

    let items = access
        .lessons
        .iter()
        .zip(locks)
        .map(|(lesson, lock)| LessonListItem {
            id: lesson.id,
            title: lesson.title.clone(),
            sort_order: lesson.sort_order,
            duration_sec: lesson.duration_sec,
            is_published: lesson.is_published,
            lock,
            progress: access.progress.get(&lesson.id).map(ProgressSnapshot::from),
        })
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/courses/{course_id}/lessons/{lesson_id}
///
/// Serve one lesson's content after re-deriving access server-side.
pub async fn get_lesson(
    user: AuthUser,
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<LessonDetail>>> {
    let viewer = user.viewer();
    let mut access = load_course_access(&state.pool, &viewer, course_id).await?;
    let position = access.authorize(&viewer, lesson_id)?;

    let progress = access.progress.get(&lesson_id).map(ProgressSnapshot::from);
    let lesson = access.lessons.swap_remove(position.index);

    Ok(Json(DataResponse {
        data: LessonDetail {
            lesson,
            position: position.index,
            previous_lesson_id: position.previous,
            next_lesson_id: position.next.lesson_id(),
            progress,
        },
    }))
}
