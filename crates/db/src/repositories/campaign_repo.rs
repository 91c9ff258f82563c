//! Repository for the `campaigns` table.

use sqlx::PgPool;
use uuid::Uuid;
use webaction_core::types::DbId;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

const COLUMNS: &str = "id, token, name, country, starts_on, ends_on, is_active, \
     assignment_mode, order_password, order_type, deferred_delivery, delivery_on, \
     created_at, updated_at";

/// CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign, returning the created row (with its generated
    /// public token).
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns \
                (name, country, starts_on, ends_on, is_active, assignment_mode, \
                 order_password, order_type, deferred_delivery, delivery_on) \
             VALUES ($1, $2, $3, $4, COALESCE($5, true), $6, $7, $8, COALESCE($9, false), $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .bind(input.is_active)
            .bind(&input.assignment_mode)
            .bind(&input.order_password)
            .bind(&input.order_type)
            .bind(input.deferred_delivery)
            .bind(input.delivery_on)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a campaign by its opaque public token (the URL segment visitors
    /// use).
    pub async fn find_by_token(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE token = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List all campaigns, newest window first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns ORDER BY starts_on DESC, id DESC");
        sqlx::query_as::<_, Campaign>(&query).fetch_all(pool).await
    }

    /// Update a campaign. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET \
                name = COALESCE($2, name), \
                country = COALESCE($3, country), \
                starts_on = COALESCE($4, starts_on), \
                ends_on = COALESCE($5, ends_on), \
                is_active = COALESCE($6, is_active), \
                assignment_mode = COALESCE($7, assignment_mode), \
                order_password = COALESCE($8, order_password), \
                order_type = COALESCE($9, order_type), \
                deferred_delivery = COALESCE($10, deferred_delivery), \
                delivery_on = COALESCE($11, delivery_on), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .bind(input.is_active)
            .bind(&input.assignment_mode)
            .bind(&input.order_password)
            .bind(&input.order_type)
            .bind(input.deferred_delivery)
            .bind(input.delivery_on)
            .fetch_optional(pool)
            .await
    }
}
