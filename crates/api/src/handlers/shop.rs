//! Public ordering-flow handlers: admission preview, identification, and
//! the quota-annotated catalog.
//!
//! Admission is evaluated per request and is side-effect-free except for
//! session issuance on a successful identify.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use webaction_core::campaign::{self, AssignmentMode, CampaignStatus, Country, DenialReason};
use webaction_core::quota::Remaining;
use webaction_core::types::DbId;
use webaction_db::models::campaign::Campaign;
use webaction_db::repositories::{
    CampaignCustomerRepo, CampaignItemRepo, CampaignRepo, CustomerDirectoryRepo, QuotaLedger,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::session::ShopSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Campaign fields exposed to visitors. Internal ids, the assignment mode,
/// and the password stay server-side.
#[derive(Debug, Serialize)]
pub struct CampaignSummary {
    pub token: Uuid,
    pub name: String,
    pub country: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub order_type: String,
    pub deferred_delivery: bool,
    pub delivery_on: Option<NaiveDate>,
}

impl From<&Campaign> for CampaignSummary {
    fn from(c: &Campaign) -> Self {
        Self {
            token: c.token,
            name: c.name.clone(),
            country: c.country.clone(),
            starts_on: c.starts_on,
            ends_on: c.ends_on,
            order_type: c.order_type.clone(),
            deferred_delivery: c.deferred_delivery,
            delivery_on: c.delivery_on,
        }
    }
}

/// Response of the admission preview.
#[derive(Debug, Serialize)]
pub struct PreviewView {
    pub status: CampaignStatus,
    pub requires_password: bool,
    pub campaign: CampaignSummary,
}

/// Response of a successful identification.
#[derive(Debug, Serialize)]
pub struct IdentifyView {
    pub session_token: Uuid,
    pub campaign: CampaignSummary,
}

/// One catalog entry annotated with fresh availability.
#[derive(Debug, Serialize)]
pub struct CatalogItemView {
    pub id: DbId,
    pub product_code: String,
    pub label: String,
    pub available_for_customer: Remaining,
    pub available_global: Remaining,
    pub max_orderable: Remaining,
    pub is_orderable: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Civil date used for window evaluation and the export header.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Resolve a campaign by public token.
pub(crate) async fn find_campaign(pool: &PgPool, token: Uuid) -> AppResult<Campaign> {
    CampaignRepo::find_by_token(pool, token)
        .await?
        .ok_or(AppError::CampaignNotFound)
}

/// Reject with the matching denial unless the campaign is currently active.
pub(crate) fn ensure_active(c: &Campaign) -> AppResult<()> {
    let status = campaign::window_status(c.starts_on, c.ends_on, c.is_active, today());
    match DenialReason::from_status(status) {
        Some(reason) => Err(AppError::Denied(reason)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// GET /c/{token}
// ---------------------------------------------------------------------------

/// Admission preview: resolves the campaign and reports its window status so
/// the storefront can render the catalog entry page or a denial message.
pub async fn preview(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state.pool, token).await?;
    let status = campaign::window_status(
        campaign.starts_on,
        campaign.ends_on,
        campaign.is_active,
        today(),
    );

    Ok(Json(DataResponse {
        data: PreviewView {
            status,
            requires_password: campaign.assignment_mode
                == AssignmentMode::Protected.as_str(),
            campaign: CampaignSummary::from(&campaign),
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /c/{token}/identify
// ---------------------------------------------------------------------------

/// Request body for identification.
#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    pub customer_number: String,
    pub country: String,
    pub password: Option<String>,
}

/// Run the full access gate and issue a session with an empty cart on
/// admission.
///
/// Gate order: campaign lookup, window status, assignment mode, then the
/// quota sweep -- a visitor is never admitted into a catalog with nothing
/// left to order.
pub async fn identify(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(input): Json<IdentifyRequest>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state.pool, token).await?;

    let customer_number = input.customer_number.trim().to_string();
    if customer_number.is_empty() {
        return Err(AppError::BadRequest("customer_number is required".into()));
    }
    Country::parse(&input.country)?;

    ensure_active(&campaign)?;

    let mode = AssignmentMode::parse(&campaign.assignment_mode)?;
    match mode {
        // Every identified customer is admitted.
        AssignmentMode::Automatic => {}
        AssignmentMode::Manual => {
            let allowed = CampaignCustomerRepo::contains(
                &state.pool,
                campaign.id,
                &customer_number,
                &input.country,
            )
            .await?;
            if !allowed {
                return Err(AppError::Denied(DenialReason::AccessDenied));
            }
        }
        AssignmentMode::Protected => {
            let supplied = input.password.as_deref().unwrap_or("");
            let expected = campaign.order_password.as_deref().unwrap_or("");
            if expected.is_empty() || supplied != expected {
                return Err(AppError::Denied(DenialReason::AccessDenied));
            }
            let known = CustomerDirectoryRepo::find(&state.pool, &customer_number, &input.country)
                .await?
                .is_some();
            if !known {
                return Err(AppError::Denied(DenialReason::AccessDenied));
            }
        }
    }

    let items = CampaignItemRepo::list_for_campaign(&state.pool, campaign.id, true).await?;
    let any_orderable = QuotaLedger::has_any_orderable(
        &state.pool,
        campaign.id,
        &items,
        &customer_number,
        &input.country,
    )
    .await?;
    if !any_orderable {
        return Err(AppError::Denied(DenialReason::QuotasExhausted));
    }

    let session_token = state
        .sessions
        .create(
            campaign.id,
            campaign.token,
            customer_number.clone(),
            input.country.clone(),
        )
        .await;

    tracing::info!(
        campaign_id = campaign.id,
        customer_number = %customer_number,
        country = %input.country,
        "Visitor admitted"
    );
    Ok(Json(DataResponse {
        data: IdentifyView {
            session_token,
            campaign: CampaignSummary::from(&campaign),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /c/{token}/catalog
// ---------------------------------------------------------------------------

/// List the campaign's active items with availability for the identified
/// customer. Recomputed fresh on every call.
pub async fn catalog(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
) -> AppResult<impl IntoResponse> {
    if session.campaign_token != token {
        return Err(AppError::SessionExpired);
    }
    let campaign = find_campaign(&state.pool, token).await?;
    ensure_active(&campaign)?;

    let items = CampaignItemRepo::list_for_campaign(&state.pool, campaign.id, true).await?;
    let annotated = QuotaLedger::campaign_availability(
        &state.pool,
        campaign.id,
        items,
        &session.customer_number,
        &session.country,
    )
    .await?;

    let data: Vec<CatalogItemView> = annotated
        .into_iter()
        .map(|(item, avail)| CatalogItemView {
            id: item.id,
            product_code: item.product_code,
            label: item.label,
            available_for_customer: avail.customer_remaining,
            available_global: avail.global_remaining,
            max_orderable: avail.max_orderable,
            is_orderable: avail.is_orderable,
        })
        .collect();

    tracing::debug!(campaign_id = campaign.id, count = data.len(), "Catalog listed");
    Ok(Json(DataResponse { data }))
}
