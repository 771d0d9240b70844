//! Lesson entity model.

use coursegate_core::sequencing::SequencedLesson;
use coursegate_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A lesson row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub body: String,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub sort_order: i32,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SequencedLesson for Lesson {
    fn lesson_id(&self) -> DbId {
        self.id
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn is_published(&self) -> bool {
        self.is_published
    }
}

/// DTO for inserting a lesson (seeding and fixtures).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub course_id: DbId,
    pub title: String,
    pub body: String,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub sort_order: i32,
    pub is_published: bool,
}
