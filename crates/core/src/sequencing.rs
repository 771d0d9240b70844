//! Drip-unlock sequencing over a course's lesson list.
//!
//! A lesson is reachable only once its immediate predecessor in the visible,
//! ordered list is completed. Lock state is never stored: it is recomputed
//! here from the ordering, the caller's access level, and the caller's set of
//! completed lesson ids on every read.
//!
//! The visible sequence is built once by [`visible_sequence`] and then shared
//! by the list resolver, the single-lesson guard, the progress aggregate, and
//! next-lesson lookup, so all of them agree on positions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The fields of a lesson that sequencing depends on.
pub trait SequencedLesson {
    fn lesson_id(&self) -> DbId;
    /// Authoring order. Not guaranteed unique or contiguous.
    fn sort_order(&self) -> i32;
    fn is_published(&self) -> bool;
}

/// How the caller relates to the course commercially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Admins and instructors: nothing is ever locked.
    Privileged,
    /// Active enrollment: drip sequencing applies.
    Entitled,
    /// Anything else: every lesson is locked.
    NotEntitled,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Why a lesson is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockReason {
    PrevNotCompleted,
    NotEntitled,
}

/// Derived lock annotation for one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockState {
    pub locked: bool,
    pub lock_reason: Option<LockReason>,
}

impl LockState {
    pub const UNLOCKED: LockState = LockState {
        locked: false,
        lock_reason: None,
    };

    pub fn locked(reason: LockReason) -> Self {
        Self {
            locked: true,
            lock_reason: Some(reason),
        }
    }
}

/// What follows a lesson in the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextLesson {
    Lesson(DbId),
    /// The lesson is last, or the course has no visible lessons at all.
    EndOfCourse,
}

impl NextLesson {
    pub fn lesson_id(&self) -> Option<DbId> {
        match self {
            NextLesson::Lesson(id) => Some(*id),
            NextLesson::EndOfCourse => None,
        }
    }
}

/// A lesson's place in the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub previous: Option<DbId>,
    pub next: NextLesson,
}

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Filter a course's lessons to those the caller may see and sort them into
/// the canonical order `(sort_order ASC, id ASC)`.
///
/// Unpublished lessons are dropped for non-privileged callers *before* any
/// position is assigned: they neither occupy a slot nor block the chain.
pub fn visible_sequence<L: SequencedLesson>(mut lessons: Vec<L>, privileged: bool) -> Vec<L> {
    lessons.retain(|l| privileged || l.is_published());
    lessons.sort_by_key(|l| (l.sort_order(), l.lesson_id()));
    lessons
}

/// Annotate an already-visible, already-ordered lesson list with lock state.
///
/// Single left-to-right pass; only the immediate predecessor's completion is
/// consulted, never a cumulative count. `completed` is not read at all unless
/// the caller is entitled.
pub fn resolve_locks<L: SequencedLesson>(
    lessons: &[L],
    access: Access,
    completed: &HashSet<DbId>,
) -> Vec<LockState> {
    match access {
        Access::Privileged => vec![LockState::UNLOCKED; lessons.len()],
        Access::NotEntitled => vec![LockState::locked(LockReason::NotEntitled); lessons.len()],
        Access::Entitled => {
            let predecessors =
                std::iter::once(None).chain(lessons.iter().map(|l| Some(l.lesson_id())));
            predecessors
                .zip(lessons)
                .map(|(prev, _)| match prev {
                    Some(prev_id) if !completed.contains(&prev_id) => {
                        LockState::locked(LockReason::PrevNotCompleted)
                    }
                    _ => LockState::UNLOCKED,
                })
                .collect()
        }
    }
}

/// Locate a lesson in the visible sequence.
///
/// Returns `None` when the lesson is not part of it (absent, hidden, or from
/// another course).
pub fn position_of<L: SequencedLesson>(lessons: &[L], lesson_id: DbId) -> Option<Position> {
    let index = lessons.iter().position(|l| l.lesson_id() == lesson_id)?;
    let previous = index
        .checked_sub(1)
        .map(|prev| lessons[prev].lesson_id());
    let next = lessons
        .get(index + 1)
        .map_or(NextLesson::EndOfCourse, |l| NextLesson::Lesson(l.lesson_id()));
    Some(Position {
        index,
        previous,
        next,
    })
}

/// The first visible lesson the caller has not completed, used for resume.
pub fn first_incomplete<L: SequencedLesson>(
    lessons: &[L],
    completed: &HashSet<DbId>,
) -> NextLesson {
    lessons
        .iter()
        .find(|l| !completed.contains(&l.lesson_id()))
        .map_or(NextLesson::EndOfCourse, |l| NextLesson::Lesson(l.lesson_id()))
}
