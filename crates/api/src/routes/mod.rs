//! Route definitions.
//!
//! The public ordering flow lives at the root (`/c/{token}/...`), matching
//! the URLs printed on campaign invitations; the admin surface is nested
//! under `/api/v1/admin` and fronted by the deployment's own auth.

pub mod admin;
pub mod health;
pub mod shop;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/admin", admin::router())
}
