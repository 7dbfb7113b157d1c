use axum::routing::get;
use axum::Router;

use crate::handlers::sensors;
use crate::state::AppState;

/// Routes mounted at `/sensors`.
pub fn router() -> Router<AppState> {
    Router::new().route("/latest", get(sensors::latest))
}
