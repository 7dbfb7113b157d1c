//! Handlers for the `/sensors` resource.

use axum::extract::State;
use axum::Json;
use baitong_sensors::SensorSnapshot;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/sensors/latest
///
/// The newest global snapshot, or `null` when the store has no rows.
pub async fn latest(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Option<SensorSnapshot>>>> {
    let snapshot = state.sensors.latest_snapshot(None).await?;
    Ok(Json(DataResponse::new(snapshot)))
}
