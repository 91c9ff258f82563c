//! Admin order handlers: listing for reporting, the exporter-confirmation
//! status transition, and export regeneration.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use webaction_core::error::CoreError;
use webaction_core::order::{self, OrderStatus};
use webaction_core::types::DbId;
use webaction_db::models::order::Order;
use webaction_db::repositories::OrderRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::admin_campaigns::ensure_campaign_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Verify that an order exists, returning the full row.
async fn ensure_order_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Order> {
    OrderRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        })
    })
}

// ---------------------------------------------------------------------------
// GET /admin/campaigns/{id}/orders
// ---------------------------------------------------------------------------

/// List a campaign's orders, newest first. Read by reporting.
pub async fn list_orders(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    let orders = OrderRepo::list_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

// ---------------------------------------------------------------------------
// GET /admin/orders/{id}
// ---------------------------------------------------------------------------

/// Get an order with its lines.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = OrderRepo::find_with_lines(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))?;
    Ok(Json(DataResponse { data: order }))
}

// ---------------------------------------------------------------------------
// PUT /admin/orders/{id}/status
// ---------------------------------------------------------------------------

/// Request body for the exporter-confirmation transition.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}

/// Move an order through its lifecycle (`pending_sync` to `synced`/`error`,
/// or cancellation). Cancelling releases the order's lines from quota
/// arithmetic by construction of the ledger query.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_order_exists(&state.pool, id).await?;

    let from = OrderStatus::parse(&existing.status)?;
    let to = OrderStatus::parse(&input.status)?;
    order::validate_transition(from, to)?;

    let updated = OrderRepo::update_status(&state.pool, id, to.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))?;
    tracing::info!(id, from = from.as_str(), to = to.as_str(), "Order status updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /admin/orders/{id}/export
// ---------------------------------------------------------------------------

/// Response of an export regeneration.
#[derive(Debug, Serialize)]
pub struct ExportView {
    pub path: String,
}

/// Regenerate the ERP `.txt` artifact for an order (e.g. after a failed
/// write at finalization).
pub async fn regenerate_export(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = ensure_order_exists(&state.pool, id).await?;
    let lines = OrderRepo::lines_for_order(&state.pool, order.id).await?;
    let campaign = ensure_campaign_exists(&state.pool, order.campaign_id).await?;

    let path = crate::export::write_order_export(
        &state.config.export_dir,
        &campaign,
        &order,
        &lines,
    )
    .await?;

    Ok(Json(DataResponse {
        data: ExportView {
            path: path.display().to_string(),
        },
    }))
}
