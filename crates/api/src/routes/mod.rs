pub mod auth;
pub mod health;
pub mod plants;
pub mod qr;
pub mod sensors;
pub mod users;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;
use baitong_core::error::CoreError;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                      login (public)
/// /auth/logout                     logout (bearer)
/// /auth/me                         current session
///
/// /users                           list, create (admin)
/// /users/{id}                      get, update, delete (admin)
///
/// /plants                          list (any role), create (admin)
/// /plants/{id}                     get (any role), update, delete (admin)
/// /plants/{id}/qr-tokens           tokens of a plant (admin)
///
/// /qr/generate                     mint a token (any role)
/// /qr/tokens/{id}/revoke           revoke a token (admin)
/// /qr/scan/{token}                 aggregated public view (public)
///
/// /sensors/latest                  newest global snapshot (any role)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/plants", plants::router())
        .nest("/qr", qr::router())
        .nest("/sensors", sensors::router())
}

/// Fallback for every unmatched path.
pub async fn not_found() -> AppError {
    AppError::Core(CoreError::NotFoundMessage("Endpoint not found".into()))
}
