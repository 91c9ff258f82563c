//! The quota ledger: on-demand remaining-allocation computation.
//!
//! There is no persisted counter. Usage is summed from the lines of
//! non-cancelled orders on every call, and the pure arithmetic in
//! `webaction_core::quota` turns those sums into availability. Methods are
//! generic over the executor so the identical queries run against the pool
//! and inside the finalization transaction.

use std::collections::HashMap;

use sqlx::PgExecutor;
use webaction_core::quota::{self, ItemAvailability, ItemUsage};
use webaction_core::types::DbId;

use crate::models::item::CampaignItem;
use crate::models::order::ItemUsageRow;

const ITEM_USAGE_SQL: &str = "\
    SELECT \
        COALESCE(SUM(ol.quantity) FILTER \
            (WHERE o.customer_number = $2 AND o.country = $3), 0)::BIGINT AS customer_used, \
        COALESCE(SUM(ol.quantity), 0)::BIGINT AS global_used \
    FROM order_lines ol \
    JOIN orders o ON o.id = ol.order_id \
    WHERE ol.item_id = $1 AND o.status <> 'cancelled'";

const CAMPAIGN_USAGE_SQL: &str = "\
    SELECT ol.item_id, \
        COALESCE(SUM(ol.quantity) FILTER \
            (WHERE o.customer_number = $2 AND o.country = $3), 0)::BIGINT AS customer_used, \
        COALESCE(SUM(ol.quantity), 0)::BIGINT AS global_used \
    FROM order_lines ol \
    JOIN orders o ON o.id = ol.order_id \
    JOIN campaign_items ci ON ci.id = ol.item_id \
    WHERE ci.campaign_id = $1 AND o.status <> 'cancelled' \
    GROUP BY ol.item_id";

/// Computes what a customer, and the campaign as a whole, may still order.
pub struct QuotaLedger;

impl QuotaLedger {
    /// Consumed usage for one item: the requesting customer's units and the
    /// global units, over non-cancelled orders.
    pub async fn usage_for_item<'e, E>(
        executor: E,
        item_id: DbId,
        customer_number: &str,
        country: &str,
    ) -> Result<ItemUsage, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (customer_used, global_used): (i64, i64) = sqlx::query_as(ITEM_USAGE_SQL)
            .bind(item_id)
            .bind(customer_number)
            .bind(country)
            .fetch_one(executor)
            .await?;
        Ok(ItemUsage {
            customer_used,
            global_used,
        })
    }

    /// Fresh availability for one item and one customer.
    pub async fn availability<'e, E>(
        executor: E,
        item: &CampaignItem,
        customer_number: &str,
        country: &str,
    ) -> Result<ItemAvailability, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let usage = Self::usage_for_item(executor, item.id, customer_number, country).await?;
        Ok(quota::availability(
            item.max_per_customer,
            item.max_total,
            usage,
        ))
    }

    /// Usage sums for every ordered item of a campaign, keyed by item id.
    /// Items that have never been ordered are absent (zero usage).
    pub async fn campaign_usage<'e, E>(
        executor: E,
        campaign_id: DbId,
        customer_number: &str,
        country: &str,
    ) -> Result<HashMap<DbId, ItemUsage>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<ItemUsageRow> = sqlx::query_as(CAMPAIGN_USAGE_SQL)
            .bind(campaign_id)
            .bind(customer_number)
            .bind(country)
            .fetch_all(executor)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.item_id,
                    ItemUsage {
                        customer_used: r.customer_used,
                        global_used: r.global_used,
                    },
                )
            })
            .collect())
    }

    /// Availability for each given item of a campaign, in input order.
    pub async fn campaign_availability<'e, E>(
        executor: E,
        campaign_id: DbId,
        items: Vec<CampaignItem>,
        customer_number: &str,
        country: &str,
    ) -> Result<Vec<(CampaignItem, ItemAvailability)>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let usage = Self::campaign_usage(executor, campaign_id, customer_number, country).await?;
        Ok(items
            .into_iter()
            .map(|item| {
                let used = usage.get(&item.id).copied().unwrap_or_default();
                let avail = quota::availability(item.max_per_customer, item.max_total, used);
                (item, avail)
            })
            .collect())
    }

    /// Whether at least one of the given (active) items is still orderable
    /// for this customer. Used by the access gate to avoid admitting a
    /// visitor into an empty catalog.
    pub async fn has_any_orderable<'e, E>(
        executor: E,
        campaign_id: DbId,
        items: &[CampaignItem],
        customer_number: &str,
        country: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let usage = Self::campaign_usage(executor, campaign_id, customer_number, country).await?;
        Ok(items.iter().any(|item| {
            let used = usage.get(&item.id).copied().unwrap_or_default();
            quota::availability(item.max_per_customer, item.max_total, used).is_orderable
        }))
    }
}
