//! Shared loading for course-scoped access decisions.
//!
//! Every handler that decides access builds the same inputs here: the
//! visible course, the caller's visible lesson sequence, the gate state
//! derived from the ledger, and the caller's progress. Nothing is cached
//! between requests, so a decision always reflects the latest writes.

use std::collections::{HashMap, HashSet};

use coursegate_core::error::CoreError;
use coursegate_core::gate::{derive_gate, GateState, LedgerSnapshot};
use coursegate_core::guard::{authorize_lesson, ensure_course_visible};
use coursegate_core::roles::Viewer;
use coursegate_core::sequencing::{visible_sequence, Access, Position};
use coursegate_core::types::DbId;
use coursegate_db::models::course::Course;
use coursegate_db::models::enrollment::Enrollment;
use coursegate_db::models::lesson::Lesson;
use coursegate_db::models::order::Order;
use coursegate_db::models::progress::LessonProgress;
use coursegate_db::repositories::{
    CourseRepo, EnrollmentRepo, LessonRepo, OrderRepo, ProgressRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Everything an access decision for one (caller, course) pair depends on.
#[derive(Debug)]
pub struct CourseAccess {
    pub course: Course,
    /// Lessons the caller may see, in canonical order.
    pub lessons: Vec<Lesson>,
    pub gate: GateState,
    /// The caller's progress rows keyed by lesson id. Left empty when the
    /// caller is not entitled, since progress does not affect their locks.
    pub progress: HashMap<DbId, LessonProgress>,
}

impl CourseAccess {
    pub fn completed(&self) -> HashSet<DbId> {
        self.progress
            .values()
            .filter(|p| p.is_completed())
            .map(|p| p.lesson_id)
            .collect()
    }

    /// Re-derive the decision for one lesson. Client-held lock flags play
    /// no part in this.
    pub fn authorize(&self, viewer: &Viewer, lesson_id: DbId) -> Result<Position, CoreError> {
        authorize_lesson(
            Some(viewer),
            &self.gate,
            &self.lessons,
            lesson_id,
            &self.completed(),
        )
    }
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Load a course, treating unpublished courses as absent for
/// non-privileged callers.
pub async fn find_visible_course(
    pool: &PgPool,
    viewer: &Viewer,
    course_id: DbId,
) -> AppResult<Course> {
    let course = CourseRepo::find_by_id(pool, course_id).await?;
    ensure_course_visible(viewer, course_id, course.as_ref().map(|c| c.is_published))?;
    course.ok_or_else(|| not_found("Course", course_id))
}

/// Derive the caller's gate state for a course from the ledger.
pub async fn read_gate(pool: &PgPool, viewer: &Viewer, course_id: DbId) -> AppResult<GateState> {
    // Privileged callers bypass the ledger entirely.
    if viewer.privileged {
        return Ok(derive_gate(Some(viewer), &LedgerSnapshot::default()));
    }

    let enrollment = EnrollmentRepo::find_latest(pool, viewer.user_id, course_id).await?;
    let order = OrderRepo::find_latest(pool, viewer.user_id, course_id).await?;

    let ledger = LedgerSnapshot {
        latest_enrollment: enrollment.as_ref().map(Enrollment::fact).transpose()?,
        latest_order: order.as_ref().map(Order::fact).transpose()?,
    };
    let gate = derive_gate(Some(viewer), &ledger);

    tracing::debug!(
        user_id = viewer.user_id,
        course_id,
        gate = gate.as_str(),
        "Derived enrollment gate"
    );
    Ok(gate)
}

/// Load the course, visible sequence, gate, and (when it matters) progress.
pub async fn load_course_access(
    pool: &PgPool,
    viewer: &Viewer,
    course_id: DbId,
) -> AppResult<CourseAccess> {
    let course = find_visible_course(pool, viewer, course_id).await?;
    let lessons = visible_sequence(
        LessonRepo::list_by_course(pool, course_id).await?,
        viewer.privileged,
    );
    let gate = read_gate(pool, viewer, course_id).await?;

    let progress = if gate.access() == Access::NotEntitled {
        HashMap::new()
    } else {
        ProgressRepo::list_for_course(pool, viewer.user_id, course_id)
            .await?
            .into_iter()
            .map(|p| (p.lesson_id, p))
            .collect()
    };

    Ok(CourseAccess {
        course,
        lessons,
        gate,
        progress,
    })
}

/// Guard for routes addressed by lesson id alone (progress writes,
/// completion). Resolves the owning course and applies the same checks as a
/// direct lesson fetch.
///
/// A lesson in a hidden course reports the lesson as not found, so the
/// course's existence does not leak either.
pub async fn authorize_lesson_by_id(
    pool: &PgPool,
    viewer: &Viewer,
    lesson_id: DbId,
) -> AppResult<(CourseAccess, Position)> {
    let lesson = LessonRepo::find_by_id(pool, lesson_id)
        .await?
        .ok_or_else(|| not_found("Lesson", lesson_id))?;

    let access = match load_course_access(pool, viewer, lesson.course_id).await {
        Err(AppError::Core(CoreError::NotFound { .. })) => {
            return Err(not_found("Lesson", lesson_id))
        }
        other => other?,
    };

    let position = access.authorize(viewer, lesson_id)?;
    Ok((access, position))
}
