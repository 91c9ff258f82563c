use std::sync::Arc;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: webaction_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory visitor session store (identity + cart per campaign visit).
    pub sessions: Arc<SessionStore>,
}
