//! Enrollment and order status values.
//!
//! These must match the CHECK constraints in
//! `20260301000005_create_enrollment_ledger.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ENROLLMENT_ACTIVE: &str = "active";
pub const ENROLLMENT_PENDING: &str = "pending";
pub const ENROLLMENT_CANCELLED: &str = "cancelled";

/// All valid enrollment status strings.
pub const VALID_ENROLLMENT_STATUSES: &[&str] =
    &[ENROLLMENT_ACTIVE, ENROLLMENT_PENDING, ENROLLMENT_CANCELLED];

pub const ORDER_PENDING: &str = "pending";
pub const ORDER_PAID: &str = "paid";
pub const ORDER_FAILED: &str = "failed";

/// All valid order status strings.
pub const VALID_ORDER_STATUSES: &[&str] = &[ORDER_PENDING, ORDER_PAID, ORDER_FAILED];

/// Upper bound for an order amount, in minor currency units.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Commercial state of a user's enrollment in a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
    Pending,
    Cancelled,
}

impl EnrollmentStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ENROLLMENT_ACTIVE => Ok(Self::Active),
            ENROLLMENT_PENDING => Ok(Self::Pending),
            ENROLLMENT_CANCELLED => Ok(Self::Cancelled),
            _ => Err(CoreError::Internal(format!(
                "Invalid enrollment status '{s}'. Must be one of: {}",
                VALID_ENROLLMENT_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => ENROLLMENT_ACTIVE,
            Self::Pending => ENROLLMENT_PENDING,
            Self::Cancelled => ENROLLMENT_CANCELLED,
        }
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ORDER_PENDING => Ok(Self::Pending),
            ORDER_PAID => Ok(Self::Paid),
            ORDER_FAILED => Ok(Self::Failed),
            _ => Err(CoreError::Internal(format!(
                "Invalid order status '{s}'. Must be one of: {}",
                VALID_ORDER_STATUSES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => ORDER_PENDING,
            Self::Paid => ORDER_PAID,
            Self::Failed => ORDER_FAILED,
        }
    }

    /// Only pending orders may be settled (paid or failed).
    pub fn can_settle(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Validate an order amount taken from the course price.
pub fn validate_amount(amount_cents: i64) -> Result<(), CoreError> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&amount_cents) {
        return Err(CoreError::Validation(format!(
            "Order amount must be between 0 and {MAX_AMOUNT_CENTS} cents, got {amount_cents}"
        )));
    }
    Ok(())
}
