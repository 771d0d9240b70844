//! Order entity model.

use coursegate_core::enrollment::OrderStatus;
use coursegate_core::error::CoreError;
use coursegate_core::gate::OrderFact;
use coursegate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An order row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub enrollment_id: Option<DbId>,
    pub status: String,
    pub amount_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn status(&self) -> Result<OrderStatus, CoreError> {
        OrderStatus::from_str_value(&self.status)
    }

    /// The part of this row the gate consults.
    pub fn fact(&self) -> Result<OrderFact, CoreError> {
        Ok(OrderFact {
            status: self.status()?,
            created_at: self.created_at,
        })
    }
}
