//! Route definitions for the `/plants` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{plants, qr};
use crate::state::AppState;

/// Routes mounted at `/plants`.
///
/// ```text
/// GET    /                 -> list_plants (any role)
/// POST   /                 -> create_plant (admin)
/// GET    /{id}             -> get_plant (any role)
/// PUT    /{id}             -> update_plant (admin)
/// DELETE /{id}             -> delete_plant (admin)
/// GET    /{id}/qr-tokens   -> list_for_plant (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(plants::list_plants).post(plants::create_plant))
        .route(
            "/{id}",
            get(plants::get_plant)
                .put(plants::update_plant)
                .delete(plants::delete_plant),
        )
        .route("/{id}/qr-tokens", get(qr::list_for_plant))
}
