//! Promotional-item models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use webaction_core::types::{DbId, Timestamp};

/// A row from the `campaign_items` table.
///
/// `max_total` / `max_per_customer` are NULL for unbounded; the tagged
/// `Remaining` representation exists only in quota arithmetic.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignItem {
    pub id: DbId,
    pub campaign_id: DbId,
    pub product_code: String,
    pub label: String,
    pub max_total: Option<i64>,
    pub max_per_customer: Option<i64>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an item to a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaignItem {
    #[validate(length(min = 1, max = 35))]
    pub product_code: String,
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    pub max_total: Option<i64>,
    pub max_per_customer: Option<i64>,
    pub is_active: Option<bool>,
}

/// DTO for updating an item. Only non-`None` fields are applied; a limit
/// cannot be cleared through this DTO.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCampaignItem {
    #[validate(length(min = 1, max = 200))]
    pub label: Option<String>,
    pub max_total: Option<i64>,
    pub max_per_customer: Option<i64>,
    pub is_active: Option<bool>,
}
