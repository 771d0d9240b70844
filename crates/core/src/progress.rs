//! Lesson progress status values, validation, and course aggregates.
//!
//! A missing progress row is a valid state meaning [`ProgressStatus::NotStarted`].
//! Status only moves forward: once `completed`, normal writes never
//! downgrade it. The database upsert enforces this atomically; the helpers
//! here describe the same rule for callers that reason about rows in memory.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sequencing::SequencedLesson;
use crate::types::DbId;

pub const PROGRESS_NOT_STARTED: &str = "not_started";
pub const PROGRESS_IN_PROGRESS: &str = "in_progress";
pub const PROGRESS_COMPLETED: &str = "completed";

/// All valid progress status strings.
pub const VALID_PROGRESS_STATUSES: &[&str] =
    &[PROGRESS_NOT_STARTED, PROGRESS_IN_PROGRESS, PROGRESS_COMPLETED];

/// Percent watched/read is stored as an integer in this range.
pub const MAX_PERCENT: i16 = 100;

/// Per-lesson progress state. Variants are declared in forward order so the
/// derived `Ord` matches the allowed direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            PROGRESS_NOT_STARTED => Ok(Self::NotStarted),
            PROGRESS_IN_PROGRESS => Ok(Self::InProgress),
            PROGRESS_COMPLETED => Ok(Self::Completed),
            _ => Err(CoreError::Internal(format!(
                "Invalid progress status '{s}'. Must be one of: {}",
                VALID_PROGRESS_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => PROGRESS_NOT_STARTED,
            Self::InProgress => PROGRESS_IN_PROGRESS,
            Self::Completed => PROGRESS_COMPLETED,
        }
    }

    /// Status after recording a progress heartbeat on a row in `current`
    /// state (`None` for no row).
    pub fn after_record(current: Option<Self>) -> Self {
        current.map_or(Self::InProgress, |s| s.max(Self::InProgress))
    }
}

/// A progress heartbeat from the player. Omitted fields keep their stored
/// values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub percent: Option<i16>,
    pub position_sec: Option<i32>,
}

impl ProgressUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(percent) = self.percent {
            if !(0..=MAX_PERCENT).contains(&percent) {
                return Err(CoreError::Validation(format!(
                    "percent must be between 0 and {MAX_PERCENT}, got {percent}"
                )));
            }
        }
        if let Some(position) = self.position_sec {
            if position < 0 {
                return Err(CoreError::Validation(format!(
                    "position_sec must not be negative, got {position}"
                )));
            }
        }
        Ok(())
    }
}

/// Completion summary for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Completed lesson ids, in sequence order. Only visible lessons count.
    pub completed_lesson_ids: Vec<DbId>,
    pub total_lessons: usize,
    /// `completed / total * 100`, rounded to one decimal. Zero for a course
    /// with no visible lessons.
    pub percent: f64,
    /// Where to resume; `None` when every visible lesson is done.
    pub next_lesson_id: Option<DbId>,
}

/// Summarize completion over the caller's visible sequence.
///
/// Completed rows for lessons outside the sequence (unpublished, or moved to
/// another course) are ignored.
pub fn summarize<L: SequencedLesson>(lessons: &[L], completed: &HashSet<DbId>) -> CourseProgress {
    let completed_lesson_ids: Vec<DbId> = lessons
        .iter()
        .map(|l| l.lesson_id())
        .filter(|id| completed.contains(id))
        .collect();

    CourseProgress {
        percent: course_percent(completed_lesson_ids.len(), lessons.len()),
        total_lessons: lessons.len(),
        next_lesson_id: crate::sequencing::first_incomplete(lessons, completed).lesson_id(),
        completed_lesson_ids,
    }
}

/// `completed / total` as a percentage with one decimal place.
pub fn course_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = completed as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
