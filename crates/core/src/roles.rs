//! Well-known role name constants and the privileged-caller check.
//!
//! These must match the seed data in `20260301000002_create_roles_table.sql`.

use serde::Serialize;

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_LEARNER: &str = "learner";

/// Roles that bypass both the commercial gate and drip sequencing, and may
/// see unpublished content.
pub const PRIVILEGED_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_INSTRUCTOR];

/// Whether the given role name grants privileged access.
pub fn is_privileged(role: &str) -> bool {
    PRIVILEGED_ROLES.contains(&role)
}

/// An authenticated caller as seen by the access rules.
///
/// Anonymous callers are represented by `Option<&Viewer>::None` at the call
/// sites rather than by a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub user_id: DbId,
    pub privileged: bool,
}

impl Viewer {
    pub fn from_role(user_id: DbId, role: &str) -> Self {
        Self {
            user_id,
            privileged: is_privileged(role),
        }
    }

    /// Unpublished courses and lessons are only visible to privileged callers.
    pub fn can_see(&self, published: bool) -> bool {
        published || self.privileged
    }
}
