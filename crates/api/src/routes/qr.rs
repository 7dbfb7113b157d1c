//! Route definitions for the `/qr` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qr;
use crate::state::AppState;

/// Routes mounted at `/qr`.
///
/// ```text
/// POST /generate            -> generate (requires auth)
/// POST /tokens/{id}/revoke  -> revoke (admin)
/// GET  /scan/{token}        -> scan (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(qr::generate))
        .route("/tokens/{id}/revoke", post(qr::revoke))
        .route("/scan/{token}", get(qr::scan))
}
