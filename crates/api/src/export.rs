//! Writes ERP export artifacts to the configured drop directory.
//!
//! The byte layout comes from the pure encoder in `webaction_core::export`;
//! this module only decides the path and performs the file I/O.

use std::path::{Path, PathBuf};

use webaction_core::campaign::{Country, OrderType};
use webaction_core::export::{self, ErpLine, ErpOrder};
use webaction_db::models::campaign::Campaign;
use webaction_db::models::order::{Order, OrderLine};

use crate::error::AppError;

/// Render and write the `.txt` artifact for a finalized order.
///
/// The file lands in `{export_dir}/commande_{country}/` under the
/// `WebAction_{timestamp}_{customer8}.txt` name the ERP import job watches
/// for. Returns the written path.
pub async fn write_order_export(
    export_dir: &Path,
    campaign: &Campaign,
    order: &Order,
    lines: &[OrderLine],
) -> Result<PathBuf, AppError> {
    let order_type = OrderType::parse(&campaign.order_type)?;
    let country = Country::parse(&order.country)?;
    let now = chrono::Local::now().naive_local();

    let erp_lines: Vec<ErpLine<'_>> = lines
        .iter()
        .map(|l| ErpLine {
            product_code: &l.product_code,
            quantity: l.quantity,
        })
        .collect();

    let document = ErpOrder {
        order_date: now.date(),
        delivery_date: campaign
            .deferred_delivery
            .then_some(campaign.delivery_on)
            .flatten(),
        customer_number: &order.customer_number,
        order_type,
        campaign_name: &campaign.name,
        lines: &erp_lines,
    };
    let text = export::encode(&document);

    let customer8 = export::normalize_customer_number(&order.customer_number);
    let dir = export_dir.join(export::export_subdir(country));
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create export directory: {e}")))?;

    let path = dir.join(export::export_file_name(now, &customer8));
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write export file: {e}")))?;

    tracing::info!(order_id = order.id, path = %path.display(), "ERP export written");
    Ok(path)
}
