//! Cart mutation and submission handlers.
//!
//! Every mutation revalidates against freshly computed availability and
//! applies atomically under the session-store lock -- either the whole
//! mutation lands or the cart is unchanged. Quota rejections are expected
//! outcomes and travel in the `{ success: false, error: ... }` payload, not
//! as HTTP errors.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use webaction_core::cart::{Cart, CartRejection};
use webaction_core::types::DbId;
use webaction_db::models::campaign::Campaign;
use webaction_db::models::item::CampaignItem;
use webaction_db::models::order::{FinalizeOutcome, NewOrderLine};
use webaction_db::repositories::{CampaignItemRepo, OrderRepo, QuotaLedger};

use crate::error::{AppError, AppResult};
use crate::handlers::shop::{ensure_active, find_campaign};
use crate::response::DataResponse;
use crate::session::ShopSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of `add` and `update`.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_code: String,
    pub quantity: i64,
}

/// Body of `remove`.
#[derive(Debug, Deserialize)]
pub struct CartRemoveRequest {
    pub product_code: String,
}

/// One line of the cart as returned to the storefront.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_code: String,
    pub quantity: i64,
}

/// Cart snapshot returned after every successful mutation.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_quantity: i64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let lines: Vec<CartLineView> = cart
            .lines()
            .iter()
            .map(|l| CartLineView {
                product_code: l.product_code.clone(),
                quantity: l.quantity,
            })
            .collect();
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        Self {
            lines,
            total_quantity,
        }
    }
}

/// Structured rejection payload; carries the current ceiling so the caller
/// can clamp and retry.
#[derive(Debug, Serialize)]
pub struct CartErrorView {
    pub code: &'static str,
    pub message: String,
    pub product_code: String,
    pub max_orderable: Option<i64>,
}

/// Envelope of every cart mutation response.
#[derive(Debug, Serialize)]
pub struct CartOpResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CartErrorView>,
}

fn accepted(cart: &Cart) -> CartOpResponse {
    CartOpResponse {
        success: true,
        cart: Some(CartView::from(cart)),
        error: None,
    }
}

fn rejected(product_code: &str, rejection: CartRejection) -> CartOpResponse {
    CartOpResponse {
        success: false,
        cart: None,
        error: Some(CartErrorView {
            code: rejection.code(),
            message: rejection_message(product_code, rejection),
            product_code: product_code.to_string(),
            max_orderable: rejection.max_orderable(),
        }),
    }
}

fn rejection_message(product_code: &str, rejection: CartRejection) -> String {
    match rejection {
        CartRejection::NotOrderable => format!("{product_code} is not orderable"),
        CartRejection::QuotaExceeded { max_orderable } => {
            format!("Only {max_orderable} unit(s) of {product_code} may still be ordered")
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the campaign and the addressed item for a cart mutation.
///
/// The session must belong to this campaign and the campaign must still be
/// active; an unknown product code is a request error.
async fn cart_context(
    state: &AppState,
    token: Uuid,
    session: &ShopSession,
    product_code: &str,
) -> AppResult<(Campaign, CampaignItem)> {
    if session.campaign_token != token {
        return Err(AppError::SessionExpired);
    }
    let campaign = find_campaign(&state.pool, token).await?;
    ensure_active(&campaign)?;

    let item = CampaignItemRepo::find_by_code(&state.pool, campaign.id, product_code)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown product code {product_code}")))?;
    Ok((campaign, item))
}

/// Apply a closure to the session's cart and return the mutation result
/// together with a post-mutation snapshot.
async fn mutate_cart<F>(
    state: &AppState,
    session_token: Uuid,
    f: F,
) -> AppResult<(Result<i64, CartRejection>, Cart)>
where
    F: FnOnce(&mut Cart) -> Result<i64, CartRejection>,
{
    state
        .sessions
        .with_cart(session_token, |cart| {
            let result = f(cart);
            (result, cart.clone())
        })
        .await
        .ok_or(AppError::SessionExpired)
}

// ---------------------------------------------------------------------------
// POST /c/{token}/cart/add
// ---------------------------------------------------------------------------

/// Add units of an item on top of what the cart already holds.
pub async fn add(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
    Json(input): Json<CartLineRequest>,
) -> AppResult<impl IntoResponse> {
    if input.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }
    let (_campaign, item) = cart_context(&state, token, &session, &input.product_code).await?;
    if !item.is_active {
        return Ok(Json(rejected(&item.product_code, CartRejection::NotOrderable)));
    }

    let availability = QuotaLedger::availability(
        &state.pool,
        &item,
        &session.customer_number,
        &session.country,
    )
    .await?;

    let (result, cart) = mutate_cart(&state, session.token, |cart| {
        cart.add(item.id, &item.product_code, input.quantity, &availability)
    })
    .await?;

    Ok(Json(match result {
        Ok(_) => accepted(&cart),
        Err(rejection) => rejected(&item.product_code, rejection),
    }))
}

// ---------------------------------------------------------------------------
// POST /c/{token}/cart/update
// ---------------------------------------------------------------------------

/// Set an item's quantity outright; zero or negative removes the line.
pub async fn update(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
    Json(input): Json<CartLineRequest>,
) -> AppResult<impl IntoResponse> {
    let (_campaign, item) = cart_context(&state, token, &session, &input.product_code).await?;
    if input.quantity > 0 && !item.is_active {
        return Ok(Json(rejected(&item.product_code, CartRejection::NotOrderable)));
    }

    let availability = QuotaLedger::availability(
        &state.pool,
        &item,
        &session.customer_number,
        &session.country,
    )
    .await?;

    let (result, cart) = mutate_cart(&state, session.token, |cart| {
        cart.set_quantity(item.id, &item.product_code, input.quantity, &availability)
    })
    .await?;

    Ok(Json(match result {
        Ok(_) => accepted(&cart),
        Err(rejection) => rejected(&item.product_code, rejection),
    }))
}

// ---------------------------------------------------------------------------
// POST /c/{token}/cart/remove
// ---------------------------------------------------------------------------

/// Remove an item's line. Removing an absent line is not an error.
pub async fn remove(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
    Json(input): Json<CartRemoveRequest>,
) -> AppResult<impl IntoResponse> {
    let (_campaign, item) = cart_context(&state, token, &session, &input.product_code).await?;

    let (_, cart) = mutate_cart(&state, session.token, |cart| {
        cart.remove(item.id);
        Ok(0)
    })
    .await?;

    Ok(Json(accepted(&cart)))
}

// ---------------------------------------------------------------------------
// POST /c/{token}/cart/clear
// ---------------------------------------------------------------------------

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
) -> AppResult<impl IntoResponse> {
    if session.campaign_token != token {
        return Err(AppError::SessionExpired);
    }

    let (_, cart) = mutate_cart(&state, session.token, |cart| {
        cart.clear();
        Ok(0)
    })
    .await?;

    Ok(Json(accepted(&cart)))
}

// ---------------------------------------------------------------------------
// POST /c/{token}/cart/submit
// ---------------------------------------------------------------------------

/// Response of a successful submission.
#[derive(Debug, Serialize)]
pub struct OrderCreatedView {
    pub order_id: DbId,
}

/// Finalize the cart into a persisted order.
///
/// The binding quota check happens inside the finalization transaction; a
/// rejection there means time ran out on this cart and nothing was
/// persisted. On success the cart is emptied and the ERP artifact is
/// written; an artifact write failure leaves the order `pending_sync` for
/// regeneration.
pub async fn submit(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    session: ShopSession,
) -> AppResult<Response> {
    if session.campaign_token != token {
        return Err(AppError::SessionExpired);
    }
    let campaign = find_campaign(&state.pool, token).await?;
    ensure_active(&campaign)?;

    if session.cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let lines: Vec<NewOrderLine> = session
        .cart
        .lines()
        .iter()
        .map(|l| NewOrderLine {
            item_id: l.item_id,
            product_code: l.product_code.clone(),
            quantity: l.quantity,
        })
        .collect();

    let outcome = OrderRepo::finalize(
        &state.pool,
        &campaign,
        &session.customer_number,
        &session.country,
        &lines,
    )
    .await?;

    match outcome {
        FinalizeOutcome::Created(order) => {
            state
                .sessions
                .with_cart(session.token, |cart| cart.clear())
                .await;

            let order_lines = OrderRepo::lines_for_order(&state.pool, order.id).await?;
            if let Err(err) = crate::export::write_order_export(
                &state.config.export_dir,
                &campaign,
                &order,
                &order_lines,
            )
            .await
            {
                tracing::error!(order_id = order.id, error = %err, "ERP export write failed");
            }

            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: OrderCreatedView { order_id: order.id },
                }),
            )
                .into_response())
        }
        FinalizeOutcome::Rejected {
            product_code,
            rejection,
        } => {
            tracing::warn!(
                campaign_id = campaign.id,
                product_code = %product_code,
                code = rejection.code(),
                "Finalization rejected by binding quota check"
            );
            Ok((
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "error": rejection_message(&product_code, rejection),
                    "code": rejection.code(),
                    "product_code": product_code,
                    "max_orderable": rejection.max_orderable(),
                })),
            )
                .into_response())
        }
    }
}
