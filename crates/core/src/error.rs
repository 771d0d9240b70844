use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// `NotFound` deliberately carries only what the caller already asked for,
/// so "absent" and "hidden" produce identical errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Not entitled: {0}")]
    EntitlementDenied(String),

    #[error("Lesson {lesson_id} is locked until lesson {blocking_lesson_id} is completed")]
    SequenceLocked {
        lesson_id: DbId,
        blocking_lesson_id: DbId,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Temporarily unavailable: {0}")]
    Transient(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may safely repeat the request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transient(_))
    }
}
