//! Single-lesson access decision for direct fetches and progress writes.
//!
//! A client may hold a lesson list that says a lesson is unlocked. That flag
//! is never trusted: every direct access re-derives the decision here from
//! the gate state and the caller's progress.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::gate::GateState;
use crate::roles::Viewer;
use crate::sequencing::{position_of, Position, SequencedLesson};
use crate::types::DbId;

/// Reject callers that may not see a course.
///
/// `published` is `None` when the course does not exist. Hidden and absent
/// courses yield the same error.
pub fn ensure_course_visible(
    viewer: &Viewer,
    course_id: DbId,
    published: Option<bool>,
) -> Result<(), CoreError> {
    match published {
        Some(published) if viewer.can_see(published) => Ok(()),
        _ => Err(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }),
    }
}

/// Decide whether the caller may open `lesson_id`.
///
/// `lessons` must be the caller's visible sequence for the course (see
/// [`crate::sequencing::visible_sequence`]). Checks run in a fixed order:
/// authentication, existence, entitlement, then sequencing, so an
/// unauthenticated caller never learns about locks and an unentitled caller
/// never learns about sequencing.
pub fn authorize_lesson<L: SequencedLesson>(
    viewer: Option<&Viewer>,
    gate: &GateState,
    lessons: &[L],
    lesson_id: DbId,
    completed: &HashSet<DbId>,
) -> Result<Position, CoreError> {
    let Some(viewer) = viewer else {
        return Err(CoreError::AuthenticationRequired(
            "Sign in to open this lesson".into(),
        ));
    };

    let position = position_of(lessons, lesson_id).ok_or(CoreError::NotFound {
        entity: "Lesson",
        id: lesson_id,
    })?;

    if viewer.privileged {
        return Ok(position);
    }

    if !gate.is_allowed() {
        return Err(CoreError::EntitlementDenied(gate.message().to_string()));
    }

    match position.previous {
        Some(blocking) if !completed.contains(&blocking) => Err(CoreError::SequenceLocked {
            lesson_id,
            blocking_lesson_id: blocking,
        }),
        _ => Ok(position),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::sequencing::NextLesson;

    struct L(DbId);

    impl SequencedLesson for L {
        fn lesson_id(&self) -> DbId {
            self.0
        }
        fn sort_order(&self) -> i32 {
            self.0 as i32
        }
        fn is_published(&self) -> bool {
            true
        }
    }

    const ALLOWED: GateState = GateState::Allowed { privileged: false };

    fn lessons() -> Vec<L> {
        vec![L(1), L(2), L(3)]
    }

    fn learner() -> Viewer {
        Viewer {
            user_id: 5,
            privileged: false,
        }
    }

    fn admin() -> Viewer {
        Viewer {
            user_id: 1,
            privileged: true,
        }
    }

    #[test]
    fn unauthenticated_gets_authentication_required_not_sequence_locked() {
        let result =
            authorize_lesson(None, &GateState::Unauthorized, &lessons(), 2, &HashSet::new());
        assert_matches!(result, Err(CoreError::AuthenticationRequired(_)));
    }

    #[test]
    fn first_lesson_is_open_when_entitled() {
        let pos = authorize_lesson(Some(&learner()), &ALLOWED, &lessons(), 1, &HashSet::new())
            .unwrap();
        assert_eq!(pos.index, 0);
        assert_eq!(pos.next, NextLesson::Lesson(2));
    }

    #[test]
    fn locked_lesson_names_the_blocking_lesson() {
        let done = HashSet::from([1]);
        let result = authorize_lesson(Some(&learner()), &ALLOWED, &lessons(), 3, &done);
        assert_matches!(
            result,
            Err(CoreError::SequenceLocked {
                lesson_id: 3,
                blocking_lesson_id: 2
            })
        );
    }

    #[test]
    fn completed_predecessor_opens_lesson() {
        let done = HashSet::from([1]);
        let result = authorize_lesson(Some(&learner()), &ALLOWED, &lessons(), 2, &done);
        assert!(result.is_ok());
    }

    #[test]
    fn entitlement_checked_before_sequencing() {
        for gate in [
            GateState::NoEnrollment,
            GateState::PendingPayment,
            GateState::Cancelled,
            GateState::Error,
        ] {
            let result = authorize_lesson(Some(&learner()), &gate, &lessons(), 3, &HashSet::new());
            assert_matches!(result, Err(CoreError::EntitlementDenied(_)), "{gate:?}");
        }
    }

    #[test]
    fn missing_lesson_is_not_found_even_without_entitlement() {
        let result = authorize_lesson(
            Some(&learner()),
            &GateState::NoEnrollment,
            &lessons(),
            42,
            &HashSet::new(),
        );
        assert_matches!(result, Err(CoreError::NotFound { entity: "Lesson", id: 42 }));
    }

    #[test]
    fn privileged_skips_entitlement_and_sequencing() {
        let result = authorize_lesson(
            Some(&admin()),
            &GateState::Allowed { privileged: true },
            &lessons(),
            3,
            &HashSet::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn hidden_and_absent_courses_look_the_same() {
        let hidden = ensure_course_visible(&learner(), 9, Some(false)).unwrap_err();
        let absent = ensure_course_visible(&learner(), 9, None).unwrap_err();
        assert_eq!(hidden.to_string(), absent.to_string());
        assert!(ensure_course_visible(&admin(), 9, Some(false)).is_ok());
        assert!(ensure_course_visible(&learner(), 9, Some(true)).is_ok());
    }
}
