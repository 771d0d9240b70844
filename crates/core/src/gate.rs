//! Enrollment gate: the caller-facing state machine summarizing
//! authentication and commercial entitlement for one course.
//!
//! The gate is derived on every read from the latest enrollment and the
//! latest order. It is never stored, and a previously observed state is
//! stale as soon as the caller performs any mutating action.

use serde::{Deserialize, Serialize};

use crate::enrollment::{EnrollmentStatus, OrderStatus};
use crate::roles::Viewer;
use crate::sequencing::Access;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The closed set of gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// No valid credential. Terminal until the caller authenticates.
    Unauthorized,
    /// Authenticated, but no enrollment and no pending order.
    NoEnrollment,
    /// An order is awaiting payment confirmation.
    PendingPayment,
    /// The latest enrollment was cancelled and nothing newer exists.
    Cancelled,
    /// The ledger could not be read. Recoverable by refreshing again.
    Error,
    /// Access granted. `privileged` marks a role bypass rather than an
    /// active enrollment.
    Allowed { privileged: bool },
}

impl GateState {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateState::Allowed { .. })
    }

    /// The access level the lesson resolver should apply.
    pub fn access(&self) -> Access {
        match self {
            GateState::Allowed { privileged: true } => Access::Privileged,
            GateState::Allowed { privileged: false } => Access::Entitled,
            _ => Access::NotEntitled,
        }
    }

    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Unauthorized => "UNAUTHORIZED",
            GateState::NoEnrollment => "NO_ENROLLMENT",
            GateState::PendingPayment => "PENDING_PAYMENT",
            GateState::Cancelled => "CANCELLED",
            GateState::Error => "ERROR",
            GateState::Allowed { .. } => "ALLOWED",
        }
    }

    /// Human-readable explanation shown at the presentation boundary.
    pub fn message(&self) -> &'static str {
        match self {
            GateState::Unauthorized => "Sign in to access this course.",
            GateState::NoEnrollment => "Enroll in this course to access its lessons.",
            GateState::PendingPayment => {
                "Your payment is being processed. Access opens once it is confirmed."
            }
            GateState::Cancelled => "Your enrollment was cancelled. Enroll again to regain access.",
            GateState::Error => "Could not check your enrollment. Please try again.",
            GateState::Allowed { privileged: true } => "Staff access.",
            GateState::Allowed { privileged: false } => "You are enrolled in this course.",
        }
    }

    /// Whether the state can change without any action from the user
    /// (only by an external payment confirmation or by retrying).
    pub fn awaits_external(&self) -> bool {
        matches!(self, GateState::PendingPayment | GateState::Error)
    }
}

/// Gate state plus its message, as returned by `refreshGate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateView {
    #[serde(flatten)]
    pub state: GateState,
    pub message: String,
}

impl From<GateState> for GateView {
    fn from(state: GateState) -> Self {
        Self {
            state,
            message: state.message().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger input
// ---------------------------------------------------------------------------

/// The latest enrollment for a (user, course) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentFact {
    pub status: EnrollmentStatus,
    /// When the status last changed (cancellation time for cancelled rows).
    pub updated_at: Timestamp,
}

/// The latest order for a (user, course) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFact {
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

/// Everything the gate consults from the enrollment ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub latest_enrollment: Option<EnrollmentFact>,
    pub latest_order: Option<OrderFact>,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the gate state for a caller from the ledger.
///
/// Infrastructure failures never reach this function; the caller maps them
/// to [`GateState::Error`].
pub fn derive_gate(viewer: Option<&Viewer>, ledger: &LedgerSnapshot) -> GateState {
    let Some(viewer) = viewer else {
        return GateState::Unauthorized;
    };
    if viewer.privileged {
        return GateState::Allowed { privileged: true };
    }

    let enrollment = ledger.latest_enrollment;
    let order = ledger.latest_order;

    if enrollment.is_some_and(|e| e.status == EnrollmentStatus::Active) {
        return GateState::Allowed { privileged: false };
    }

    if order.is_some_and(|o| o.status == OrderStatus::Pending) {
        return GateState::PendingPayment;
    }

    match enrollment {
        Some(e) if e.status == EnrollmentStatus::Cancelled => {
            let newer_order = order.is_some_and(|o| o.created_at > e.updated_at);
            if !newer_order {
                return GateState::Cancelled;
            }
        }
        Some(e) if e.status == EnrollmentStatus::Pending => {
            // Paid but not yet flipped by the payment service.
            if !order.is_some_and(|o| o.status == OrderStatus::Failed) {
                return GateState::PendingPayment;
            }
        }
        _ => {}
    }

    GateState::NoEnrollment
}
