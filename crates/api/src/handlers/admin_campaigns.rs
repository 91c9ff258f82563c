//! Admin data-entry handlers for campaigns, items, and the manual-mode
//! allow-list.
//!
//! Admin authentication is handled by the deployment in front of this
//! service; these handlers only enforce the domain invariants.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use webaction_core::campaign::{self, AssignmentMode, CampaignCountry, Country, OrderType};
use webaction_core::error::CoreError;
use webaction_core::types::DbId;
use webaction_db::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};
use webaction_db::models::customer::CreateAllowedCustomer;
use webaction_db::models::item::{CreateCampaignItem, UpdateCampaignItem};
use webaction_db::repositories::{
    CampaignCustomerRepo, CampaignItemRepo, CampaignRepo,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a campaign exists, returning the full row.
pub(crate) async fn ensure_campaign_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        })
    })
}

fn validate_dto<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ===========================================================================
// CAMPAIGN HANDLERS
// ===========================================================================

// ---------------------------------------------------------------------------
// POST /admin/campaigns
// ---------------------------------------------------------------------------

/// Create a new campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    CampaignCountry::parse(&input.country)?;
    let mode = AssignmentMode::parse(&input.assignment_mode)?;
    OrderType::parse(&input.order_type)?;
    campaign::validate_window(input.starts_on, input.ends_on)?;
    campaign::validate_password(mode, input.order_password.as_deref())?;
    campaign::validate_delivery(
        input.deferred_delivery.unwrap_or(false),
        input.delivery_on,
    )?;

    let created = CampaignRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, token = %created.token, "Campaign created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /admin/campaigns
// ---------------------------------------------------------------------------

/// List all campaigns.
pub async fn list_campaigns(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = CampaignRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /admin/campaigns/{id}
// ---------------------------------------------------------------------------

/// Get a single campaign by ID.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let c = ensure_campaign_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: c }))
}

// ---------------------------------------------------------------------------
// PUT /admin/campaigns/{id}
// ---------------------------------------------------------------------------

/// Update a campaign. Invariants are validated against the merged row, so a
/// partial update cannot break them.
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_campaign_exists(&state.pool, id).await?;
    validate_dto(&input)?;

    CampaignCountry::parse(input.country.as_deref().unwrap_or(&existing.country))?;
    let mode = AssignmentMode::parse(
        input
            .assignment_mode
            .as_deref()
            .unwrap_or(&existing.assignment_mode),
    )?;
    OrderType::parse(input.order_type.as_deref().unwrap_or(&existing.order_type))?;

    let starts_on = input.starts_on.unwrap_or(existing.starts_on);
    let ends_on = input.ends_on.unwrap_or(existing.ends_on);
    campaign::validate_window(starts_on, ends_on)?;

    let password = input
        .order_password
        .as_deref()
        .or(existing.order_password.as_deref());
    campaign::validate_password(mode, password)?;

    let deferred = input.deferred_delivery.unwrap_or(existing.deferred_delivery);
    campaign::validate_delivery(deferred, input.delivery_on.or(existing.delivery_on))?;

    let updated = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    tracing::info!(id = updated.id, "Campaign updated");
    Ok(Json(DataResponse { data: updated }))
}

// ===========================================================================
// ITEM HANDLERS
// ===========================================================================

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    pub include_inactive: Option<bool>,
}

// ---------------------------------------------------------------------------
// POST /admin/campaigns/{id}/items
// ---------------------------------------------------------------------------

/// Add an item to a campaign.
pub async fn create_item(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateCampaignItem>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    validate_dto(&input)?;
    campaign::validate_item_limits(input.max_total, input.max_per_customer)?;

    let created = CampaignItemRepo::create(&state.pool, campaign_id, &input).await?;
    tracing::info!(
        id = created.id,
        campaign_id,
        product_code = %created.product_code,
        "Campaign item created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /admin/campaigns/{id}/items
// ---------------------------------------------------------------------------

/// List a campaign's items (inactive ones included on request).
pub async fn list_items(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<ListItemsParams>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    let active_only = !params.include_inactive.unwrap_or(false);
    let items = CampaignItemRepo::list_for_campaign(&state.pool, campaign_id, active_only).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// PUT /admin/items/{id}
// ---------------------------------------------------------------------------

/// Update an item.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaignItem>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    campaign::validate_item_limits(input.max_total, input.max_per_customer)?;

    let updated = CampaignItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CampaignItem",
            id,
        }))?;
    tracing::info!(id = updated.id, "Campaign item updated");
    Ok(Json(DataResponse { data: updated }))
}

// ===========================================================================
// ALLOW-LIST HANDLERS
// ===========================================================================

// ---------------------------------------------------------------------------
// POST /admin/campaigns/{id}/customers
// ---------------------------------------------------------------------------

/// Add a customer to a campaign's allow-list.
pub async fn add_allowed_customer(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateAllowedCustomer>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    Country::parse(&input.country)?;
    if input.customer_number.trim().is_empty() {
        return Err(AppError::BadRequest("customer_number is required".into()));
    }

    let created = CampaignCustomerRepo::add(&state.pool, campaign_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /admin/campaigns/{id}/customers
// ---------------------------------------------------------------------------

/// List a campaign's allow-list.
pub async fn list_allowed_customers(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    let entries = CampaignCustomerRepo::list_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/campaigns/{id}/customers
// ---------------------------------------------------------------------------

/// Query parameters identifying the allow-list entry to remove.
#[derive(Debug, Deserialize)]
pub struct RemoveAllowedCustomerParams {
    pub customer_number: String,
    pub country: String,
}

/// Remove a customer from a campaign's allow-list.
pub async fn remove_allowed_customer(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<RemoveAllowedCustomerParams>,
) -> AppResult<impl IntoResponse> {
    ensure_campaign_exists(&state.pool, campaign_id).await?;
    Country::parse(&params.country)?;

    let removed = CampaignCustomerRepo::remove(
        &state.pool,
        campaign_id,
        &params.customer_number,
        &params.country,
    )
    .await?;
    if !removed {
        return Err(AppError::BadRequest(format!(
            "Customer {} ({}) is not on the allow-list",
            params.customer_number, params.country
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
