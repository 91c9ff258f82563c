//! Routes for the public, session-gated ordering flow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{cart, shop};
use crate::state::AppState;

/// Routes mounted at the application root.
///
/// ```text
/// GET  /c/{token}              admission preview
/// POST /c/{token}/identify     identify + session issuance
/// GET  /c/{token}/catalog      quota-annotated catalog   (session)
/// POST /c/{token}/cart/add     add to cart               (session)
/// POST /c/{token}/cart/update  set quantity              (session)
/// POST /c/{token}/cart/remove  remove line               (session)
/// POST /c/{token}/cart/clear   empty cart                (session)
/// POST /c/{token}/cart/submit  finalize order            (session)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/c/{token}", get(shop::preview))
        .route("/c/{token}/identify", post(shop::identify))
        .route("/c/{token}/catalog", get(shop::catalog))
        .route("/c/{token}/cart/add", post(cart::add))
        .route("/c/{token}/cart/update", post(cart::update))
        .route("/c/{token}/cart/remove", post(cart::remove))
        .route("/c/{token}/cart/clear", post(cart::clear))
        .route("/c/{token}/cart/submit", post(cart::submit))
}
