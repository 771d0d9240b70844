//! Lesson progress model: the one canonical progress representation.

use coursegate_core::error::CoreError;
use coursegate_core::progress::ProgressStatus;
use coursegate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lesson_progress` table. Unique per (user, lesson).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub status: String,
    pub percent: i16,
    pub last_position_sec: i32,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LessonProgress {
    pub fn status(&self) -> Result<ProgressStatus, CoreError> {
        ProgressStatus::from_str_value(&self.status)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status(), Ok(ProgressStatus::Completed))
    }
}
