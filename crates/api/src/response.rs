//! Shared response envelope types for API handlers.
//!
//! Read endpoints use a `{ "data": ... }` envelope; cart mutation endpoints
//! use the `{ "success": ..., "cart": ..., "error": ... }` shape the
//! storefront consumes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
