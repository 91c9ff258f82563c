//! Customer directory and allow-list models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use webaction_core::types::{DbId, Timestamp};

/// A row from the `customers` directory mirror. Read-only for this
/// application.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomerRecord {
    pub id: DbId,
    pub customer_number: String,
    pub country: String,
    pub name: String,
}

/// A row from the `campaign_customers` allow-list (manual assignment mode).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AllowedCustomer {
    pub id: DbId,
    pub campaign_id: DbId,
    pub customer_number: String,
    pub country: String,
    pub created_at: Timestamp,
}

/// DTO for adding a customer to a campaign's allow-list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAllowedCustomer {
    pub customer_number: String,
    pub country: String,
}
