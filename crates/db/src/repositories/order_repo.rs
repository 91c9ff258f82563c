//! Repository for the `orders` and `order_lines` tables, including the
//! finalization transaction that turns a cart snapshot into a persisted
//! order.

use sqlx::PgPool;
use webaction_core::cart::CartRejection;
use webaction_core::types::DbId;

use crate::models::campaign::Campaign;
use crate::models::item::CampaignItem;
use crate::models::order::{FinalizeOutcome, NewOrderLine, Order, OrderLine, OrderWithLines};
use crate::repositories::quota_ledger::QuotaLedger;

const COLUMNS: &str = "id, campaign_id, customer_number, country, status, created_at, updated_at";
const LINE_COLUMNS: &str = "id, order_id, item_id, product_code, quantity";

/// Order persistence and the atomic finalization step.
pub struct OrderRepo;

impl OrderRepo {
    /// Finalize a cart into an order: the only place quota consumption
    /// becomes real.
    ///
    /// Runs in a single transaction holding a campaign-scoped advisory lock,
    /// so concurrent finalizations for the same campaign serialize. Every
    /// line is re-validated against fresh availability inside the
    /// transaction; the first failing line aborts the whole attempt and
    /// nothing is persisted.
    pub async fn finalize(
        pool: &PgPool,
        campaign: &Campaign,
        customer_number: &str,
        country: &str,
        lines: &[NewOrderLine],
    ) -> Result<FinalizeOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Released automatically at commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(campaign.id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            let item = sqlx::query_as::<_, CampaignItem>(
                "SELECT id, campaign_id, product_code, label, max_total, \
                 max_per_customer, is_active, created_at, updated_at \
                 FROM campaign_items WHERE id = $1",
            )
            .bind(line.item_id)
            .fetch_optional(&mut *tx)
            .await?;

            let item = match item {
                Some(item) if item.campaign_id == campaign.id && item.is_active => item,
                _ => {
                    return Ok(FinalizeOutcome::Rejected {
                        product_code: line.product_code.clone(),
                        rejection: CartRejection::NotOrderable,
                    });
                }
            };

            let availability =
                QuotaLedger::availability(&mut *tx, &item, customer_number, country).await?;
            if !availability.is_orderable {
                return Ok(FinalizeOutcome::Rejected {
                    product_code: line.product_code.clone(),
                    rejection: CartRejection::NotOrderable,
                });
            }
            if !availability.max_orderable.allows(line.quantity) {
                return Ok(FinalizeOutcome::Rejected {
                    product_code: line.product_code.clone(),
                    rejection: CartRejection::QuotaExceeded {
                        max_orderable: availability.max_orderable.bound().unwrap_or(0),
                    },
                });
            }
        }

        let insert_order = format!(
            "INSERT INTO orders (campaign_id, customer_number, country) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&insert_order)
            .bind(campaign.id)
            .bind(customer_number)
            .bind(country)
            .fetch_one(&mut *tx)
            .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_lines (order_id, item_id, product_code, quantity) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(line.item_id)
            .bind(&line.product_code)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            campaign_id = campaign.id,
            customer_number,
            line_count = lines.len(),
            "Order finalized"
        );
        Ok(FinalizeOutcome::Created(order))
    }

    /// Find an order by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order by ID, enriched with its lines.
    pub async fn find_with_lines(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrderWithLines>, sqlx::Error> {
        let order = Self::find_by_id(pool, id).await?;
        match order {
            Some(order) => {
                let lines = Self::lines_for_order(pool, order.id).await?;
                Ok(Some(OrderWithLines { order, lines }))
            }
            None => Ok(None),
        }
    }

    /// List the lines of an order.
    pub async fn lines_for_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        let query = format!("SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderLine>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// List a campaign's orders, newest first.
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM orders WHERE campaign_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Set an order's status (exporter confirmation step). Returns the
    /// updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
