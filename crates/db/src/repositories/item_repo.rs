//! Repository for the `campaign_items` table.

use sqlx::PgPool;
use webaction_core::types::DbId;

use crate::models::item::{CampaignItem, CreateCampaignItem, UpdateCampaignItem};

const COLUMNS: &str = "id, campaign_id, product_code, label, max_total, \
     max_per_customer, is_active, created_at, updated_at";

/// CRUD operations for promotional items.
pub struct CampaignItemRepo;

impl CampaignItemRepo {
    /// Insert a new item into a campaign, returning the created row.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateCampaignItem,
    ) -> Result<CampaignItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_items \
                (campaign_id, product_code, label, max_total, max_per_customer, is_active) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignItem>(&query)
            .bind(campaign_id)
            .bind(&input.product_code)
            .bind(&input.label)
            .bind(input.max_total)
            .bind(input.max_per_customer)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CampaignItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_items WHERE id = $1");
        sqlx::query_as::<_, CampaignItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item within a campaign by product code.
    pub async fn find_by_code(
        pool: &PgPool,
        campaign_id: DbId,
        product_code: &str,
    ) -> Result<Option<CampaignItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM campaign_items WHERE campaign_id = $1 AND product_code = $2");
        sqlx::query_as::<_, CampaignItem>(&query)
            .bind(campaign_id)
            .bind(product_code)
            .fetch_optional(pool)
            .await
    }

    /// List a campaign's items, optionally restricted to active ones.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        active_only: bool,
    ) -> Result<Vec<CampaignItem>, sqlx::Error> {
        let query = if active_only {
            format!(
                "SELECT {COLUMNS} FROM campaign_items \
                 WHERE campaign_id = $1 AND is_active = true \
                 ORDER BY product_code"
            )
        } else {
            format!(
                "SELECT {COLUMNS} FROM campaign_items WHERE campaign_id = $1 ORDER BY product_code"
            )
        };
        sqlx::query_as::<_, CampaignItem>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Update an item. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaignItem,
    ) -> Result<Option<CampaignItem>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_items SET \
                label = COALESCE($2, label), \
                max_total = COALESCE($3, max_total), \
                max_per_customer = COALESCE($4, max_per_customer), \
                is_active = COALESCE($5, is_active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignItem>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.max_total)
            .bind(input.max_per_customer)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
