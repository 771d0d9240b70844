//! Enrollment entity model.

use coursegate_core::enrollment::EnrollmentStatus;
use coursegate_core::error::CoreError;
use coursegate_core::gate::EnrollmentFact;
use coursegate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An enrollment row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment {
    pub fn status(&self) -> Result<EnrollmentStatus, CoreError> {
        EnrollmentStatus::from_str_value(&self.status)
    }

    /// The part of this row the gate consults.
    pub fn fact(&self) -> Result<EnrollmentFact, CoreError> {
        Ok(EnrollmentFact {
            status: self.status()?,
            updated_at: self.updated_at,
        })
    }
}
