//! Routes for the admin data-entry surface.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_campaigns, admin_orders};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /campaigns                    list
/// POST   /campaigns                    create
/// GET    /campaigns/{id}               get
/// PUT    /campaigns/{id}               update
///
/// GET    /campaigns/{id}/items         list items
/// POST   /campaigns/{id}/items         add item
/// PUT    /items/{id}                   update item
///
/// GET    /campaigns/{id}/customers     list allow-list
/// POST   /campaigns/{id}/customers     add to allow-list
/// DELETE /campaigns/{id}/customers     remove from allow-list (query params)
///
/// GET    /campaigns/{id}/orders        list orders
/// GET    /orders/{id}                  get order with lines
/// PUT    /orders/{id}/status           exporter confirmation transition
/// POST   /orders/{id}/export           regenerate ERP artifact
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/campaigns",
            get(admin_campaigns::list_campaigns).post(admin_campaigns::create_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(admin_campaigns::get_campaign).put(admin_campaigns::update_campaign),
        )
        .route(
            "/campaigns/{id}/items",
            get(admin_campaigns::list_items).post(admin_campaigns::create_item),
        )
        .route("/items/{id}", put(admin_campaigns::update_item))
        .route(
            "/campaigns/{id}/customers",
            get(admin_campaigns::list_allowed_customers)
                .post(admin_campaigns::add_allowed_customer)
                .delete(admin_campaigns::remove_allowed_customer),
        )
        .route("/campaigns/{id}/orders", get(admin_orders::list_orders))
        .route("/orders/{id}", get(admin_orders::get_order))
        .route("/orders/{id}/status", put(admin_orders::update_order_status))
        .route("/orders/{id}/export", post(admin_orders::regenerate_export))
}
