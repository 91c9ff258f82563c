//! In-memory visitor session store.
//!
//! A session is issued when the access gate admits a visitor into a
//! campaign. It binds one (customer_number, country) identity to one
//! campaign and owns that visit's [`Cart`]. Sessions are keyed by an opaque
//! token the storefront sends back in the `X-Session-Token` header, expire
//! after a configurable idle period, and are never shared between visitors.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio::sync::RwLock;
use uuid::Uuid;
use webaction_core::cart::Cart;
use webaction_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the session token on shop requests.
pub const SESSION_HEADER: &str = "x-session-token";

/// One admitted visitor's state for one campaign.
#[derive(Debug, Clone)]
pub struct ShopSession {
    pub token: Uuid,
    pub campaign_id: DbId,
    /// The campaign's public token; requests for other campaigns must not
    /// see this session.
    pub campaign_token: Uuid,
    pub customer_number: String,
    pub country: String,
    pub cart: Cart,
    last_seen: Instant,
}

/// Keyed store of live sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Expired sessions are dropped lazily on
/// access and swept on every create.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, ShopSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session with an empty cart, returning its token.
    pub async fn create(
        &self,
        campaign_id: DbId,
        campaign_token: Uuid,
        customer_number: String,
        country: String,
    ) -> Uuid {
        let token = Uuid::new_v4();
        let session = ShopSession {
            token,
            campaign_id,
            campaign_token,
            customer_number,
            country,
            cart: Cart::new(),
            last_seen: Instant::now(),
        };
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.last_seen.elapsed() <= self.ttl);
        sessions.insert(token, session);
        token
    }

    /// Fetch a live session by token, refreshing its idle clock.
    /// Returns `None` for unknown or expired tokens.
    pub async fn get(&self, token: Uuid) -> Option<ShopSession> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&token) {
            Some(session) if session.last_seen.elapsed() <= self.ttl => {
                session.last_seen = Instant::now();
                Some(session.clone())
            }
            Some(_) => {
                sessions.remove(&token);
                None
            }
            None => None,
        }
    }

    /// Run a closure against a live session's cart under the store lock.
    /// The whole mutation applies atomically with respect to other requests.
    pub async fn with_cart<F, R>(&self, token: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&token) {
            Some(session) if session.last_seen.elapsed() <= self.ttl => {
                session.last_seen = Instant::now();
                Some(f(&mut session.cart))
            }
            Some(_) => {
                sessions.remove(&token);
                None
            }
            None => None,
        }
    }

    /// Drop a session outright.
    pub async fn remove(&self, token: Uuid) {
        self.sessions.write().await.remove(&token);
    }
}

/// Extractor for shop handlers that require an admitted visitor.
///
/// Reads `X-Session-Token`, resolves it against the store, and rejects with
/// `SESSION_EXPIRED` when absent or stale. The extracted value is a snapshot;
/// cart mutations go through [`SessionStore::with_cart`].
impl FromRequestParts<AppState> for ShopSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::SessionExpired)?;

        let token = Uuid::parse_str(raw).map_err(|_| AppError::SessionExpired)?;

        state.sessions.get(token).await.ok_or(AppError::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ttl_secs: u64) -> SessionStore {
        SessionStore::new(Duration::from_secs(ttl_secs))
    }

    #[tokio::test]
    async fn created_session_is_retrievable() {
        let store = store(60);
        let campaign_token = Uuid::new_v4();
        let token = store
            .create(1, campaign_token, "802412".into(), "BE".into())
            .await;

        let session = store.get(token).await.unwrap();
        assert_eq!(session.campaign_id, 1);
        assert_eq!(session.campaign_token, campaign_token);
        assert_eq!(session.customer_number, "802412");
        assert!(session.cart.is_empty());
    }

    #[tokio::test]
    async fn unknown_token_is_none() {
        let store = store(60);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn expired_session_is_dropped() {
        let store = store(0);
        let token = store
            .create(1, Uuid::new_v4(), "802412".into(), "BE".into())
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(store.get(token).await.is_none());
        assert!(store.with_cart(token, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn with_cart_mutates_in_place() {
        let store = store(60);
        let token = store
            .create(1, Uuid::new_v4(), "802412".into(), "BE".into())
            .await;

        let availability = webaction_core::quota::availability(
            None,
            None,
            webaction_core::quota::ItemUsage::default(),
        );
        store
            .with_cart(token, |cart| {
                cart.add(7, "P700", 2, &availability).unwrap();
            })
            .await
            .unwrap();

        let session = store.get(token).await.unwrap();
        assert_eq!(session.cart.quantity_of(7), 2);
    }

    #[tokio::test]
    async fn remove_drops_session() {
        let store = store(60);
        let token = store
            .create(1, Uuid::new_v4(), "802412".into(), "BE".into())
            .await;
        store.remove(token).await;
        assert!(store.get(token).await.is_none());
    }
}
