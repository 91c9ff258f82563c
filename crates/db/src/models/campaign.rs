//! Campaign models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use webaction_core::types::{DbId, Timestamp};

/// A row from the `campaigns` table.
///
/// `order_password` never leaves the server; it is skipped on serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub token: Uuid,
    pub name: String,
    pub country: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub is_active: bool,
    pub assignment_mode: String,
    #[serde(skip_serializing)]
    pub order_password: Option<String>,
    pub order_type: String,
    pub deferred_delivery: bool,
    pub delivery_on: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new campaign. The public token is generated by the
/// database.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub country: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub is_active: Option<bool>,
    pub assignment_mode: String,
    pub order_password: Option<String>,
    pub order_type: String,
    pub deferred_delivery: Option<bool>,
    pub delivery_on: Option<NaiveDate>,
}

/// DTO for updating an existing campaign. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub country: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub assignment_mode: Option<String>,
    pub order_password: Option<String>,
    pub order_type: Option<String>,
    pub deferred_delivery: Option<bool>,
    pub delivery_on: Option<NaiveDate>,
}
