//! Order and order-line models.

use serde::Serialize;
use sqlx::FromRow;
use webaction_core::cart::CartRejection;
use webaction_core::types::{DbId, Timestamp};

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub campaign_id: DbId,
    pub customer_number: String,
    pub country: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_lines` table. Immutable once the owning order is in
/// a non-cancelled state.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderLine {
    pub id: DbId,
    pub order_id: DbId,
    pub item_id: DbId,
    pub product_code: String,
    pub quantity: i64,
}

/// Input line for order finalization, taken from a cart snapshot.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub item_id: DbId,
    pub product_code: String,
    pub quantity: i64,
}

/// An order enriched with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Per-item usage sums for one campaign, as returned by the grouped ledger
/// query.
#[derive(Debug, Clone, FromRow)]
pub struct ItemUsageRow {
    pub item_id: DbId,
    pub customer_used: i64,
    pub global_used: i64,
}

/// Result of an order finalization attempt.
///
/// `Rejected` means the binding in-transaction quota check failed for a
/// line; nothing was persisted.
#[derive(Debug)]
pub enum FinalizeOutcome {
    Created(Order),
    Rejected {
        product_code: String,
        rejection: CartRejection,
    },
}
