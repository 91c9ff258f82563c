//! Repository for the `campaign_customers` allow-list (manual assignment
//! mode).

use sqlx::PgPool;
use webaction_core::types::DbId;

use crate::models::customer::{AllowedCustomer, CreateAllowedCustomer};

const COLUMNS: &str = "id, campaign_id, customer_number, country, created_at";

/// Manages which customers may enter a manual-mode campaign.
pub struct CampaignCustomerRepo;

impl CampaignCustomerRepo {
    /// Add a customer to a campaign's allow-list, returning the created row.
    pub async fn add(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateAllowedCustomer,
    ) -> Result<AllowedCustomer, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_customers (campaign_id, customer_number, country) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AllowedCustomer>(&query)
            .bind(campaign_id)
            .bind(&input.customer_number)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// Remove a customer from the allow-list. Returns `true` if a row was
    /// removed.
    pub async fn remove(
        pool: &PgPool,
        campaign_id: DbId,
        customer_number: &str,
        country: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM campaign_customers \
             WHERE campaign_id = $1 AND customer_number = $2 AND country = $3",
        )
        .bind(campaign_id)
        .bind(customer_number)
        .bind(country)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a campaign's allow-list.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<AllowedCustomer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_customers \
             WHERE campaign_id = $1 ORDER BY customer_number"
        );
        sqlx::query_as::<_, AllowedCustomer>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a customer is on a campaign's allow-list.
    pub async fn contains(
        pool: &PgPool,
        campaign_id: DbId,
        customer_number: &str,
        country: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM campaign_customers \
                WHERE campaign_id = $1 AND customer_number = $2 AND country = $3 \
             )",
        )
        .bind(campaign_id)
        .bind(customer_number)
        .bind(country)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
