//! Handlers for the `/plants` resource.
//!
//! Reads are open to any signed-in role; writes require `admin`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use baitong_core::error::CoreError;
use baitong_core::plant::{
    parse_plant_date, require_location_and_name, status_or_default, PlantStatus,
};
use baitong_core::types::{Date, DbId};
use baitong_db::models::plant::{CreatePlant, Plant, PlantResponse, UpdatePlant};
use baitong_db::repositories::PlantRepo;
use baitong_sensors::SensorSnapshot;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /plants`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantRequest {
    #[validate(length(max = 2048))]
    pub farmer_image: Option<String>,
    #[validate(length(max = 255))]
    pub farm_location: Option<String>,
    #[validate(length(max = 255))]
    pub plant_name: Option<String>,
    pub planted_date: Option<String>,
    pub harvest_date: Option<String>,
    #[validate(length(max = 255))]
    pub sensor_device: Option<String>,
    pub status: Option<String>,
}

/// Request body for `PUT /plants/{id}`.
///
/// For nullable columns, an absent key leaves the value alone and an
/// explicit `null` clears it.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub farmer_image: Option<Option<String>>,
    #[validate(length(max = 255))]
    pub farm_location: Option<String>,
    #[validate(length(max = 255))]
    pub plant_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub planted_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub harvest_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sensor_device: Option<Option<String>>,
    pub status: Option<String>,
}

/// `?includeLatest=true` on the list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlantsQuery {
    #[serde(default)]
    pub include_latest: bool,
}

/// `?includeSensors=true` on the detail endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDetailQuery {
    #[serde(default)]
    pub include_sensors: bool,
}

/// A plant with an optional sensor snapshot attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantView {
    #[serde(flatten)]
    pub plant: PlantResponse,
    /// Outer `None`: not requested. Inner `None`: no data or lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_sensors: Option<Option<SensorSnapshot>>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn plant_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Plant", id })
}

/// Blank strings count as absent.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_date_opt(raw: Option<&str>, field: &str) -> Result<Option<Date>, CoreError> {
    match raw {
        Some(raw) => parse_plant_date(raw, field),
        None => Ok(None),
    }
}

/// Latest snapshot for a plant, or `None` with a logged warning when the
/// time-series store fails. Plant pages stay usable without sensors.
async fn snapshot_or_none(state: &AppState, device: Option<&str>) -> Option<SensorSnapshot> {
    match state.sensors.latest_snapshot(device).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch latest sensors");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/plants
///
/// Newest first. With `includeLatest=true` every row carries the same
/// global snapshot.
pub async fn list_plants(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiQuery(query): ApiQuery<ListPlantsQuery>,
) -> AppResult<Json<DataResponse<Vec<PlantView>>>> {
    let plants = PlantRepo::list(&state.pool).await?;

    let latest = if query.include_latest {
        Some(snapshot_or_none(&state, None).await)
    } else {
        None
    };

    let views = plants
        .iter()
        .map(|p| {
            Ok(PlantView {
                plant: PlantResponse::try_from(p)?,
                latest_sensors: latest.clone(),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(Json(DataResponse::new(views)))
}

/// GET /api/plants/{id}
pub async fn get_plant(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(query): ApiQuery<PlantDetailQuery>,
) -> AppResult<Json<DataResponse<PlantView>>> {
    let plant = PlantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| plant_not_found(id))?;

    let latest_sensors = if query.include_sensors {
        snapshot_or_none(&state, plant.sensor_device.as_deref()).await
    } else {
        None
    };

    Ok(Json(DataResponse::new(PlantView {
        plant: PlantResponse::try_from(&plant)?,
        latest_sensors: Some(latest_sensors),
    })))
}

/// POST /api/plants
pub async fn create_plant(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(input): ApiJson<CreatePlantRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PlantResponse>>)> {
    input.validate()?;

    let (farm_location, plant_name) =
        require_location_and_name(input.farm_location.as_deref(), input.plant_name.as_deref())?;

    let create = CreatePlant {
        farmer_image_url: non_blank(input.farmer_image.clone()),
        farm_location: farm_location.to_string(),
        plant_name: plant_name.to_string(),
        planted_date: parse_date_opt(input.planted_date.as_deref(), "plantedDate")?,
        harvest_date: parse_date_opt(input.harvest_date.as_deref(), "harvestDate")?,
        sensor_device: non_blank(input.sensor_device.clone()),
        status: status_or_default(input.status.as_deref())?,
    };

    let plant = PlantRepo::create(&state.pool, &create).await?;

    tracing::info!(plant_id = plant.id, created_by = admin.user_id, "Plant created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(PlantResponse::try_from(&plant)?)),
    ))
}

/// PUT /api/plants/{id}
///
/// Only supplied fields change.
pub async fn update_plant(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdatePlantRequest>,
) -> AppResult<Json<DataResponse<PlantResponse>>> {
    input.validate()?;
    let update = build_update(input)?;
    if update.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No fields to update".into(),
        )));
    }

    let plant: Plant = PlantRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| plant_not_found(id))?;

    tracing::info!(plant_id = id, "Plant updated");

    Ok(Json(DataResponse::new(PlantResponse::try_from(&plant)?)))
}

/// DELETE /api/plants/{id}
///
/// QR tokens for the plant go with it (`ON DELETE CASCADE`).
pub async fn delete_plant(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !PlantRepo::delete(&state.pool, id).await? {
        return Err(plant_not_found(id));
    }

    tracing::info!(plant_id = id, deleted_by = admin.user_id, "Plant deleted");

    Ok(Json(MessageResponse::new("Plant deleted")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a partial update and convert it to the repository DTO.
fn build_update(input: UpdatePlantRequest) -> Result<UpdatePlant, CoreError> {
    let required_text = |raw: Option<String>| -> Result<Option<String>, CoreError> {
        match raw {
            Some(s) if s.trim().is_empty() => Err(CoreError::Validation(
                "farmLocation and plantName cannot be empty".into(),
            )),
            Some(s) => Ok(Some(s.trim().to_string())),
            None => Ok(None),
        }
    };

    Ok(UpdatePlant {
        farmer_image_url: input.farmer_image.map(non_blank),
        farm_location: required_text(input.farm_location)?,
        plant_name: required_text(input.plant_name)?,
        planted_date: input
            .planted_date
            .map(|raw| parse_date_opt(raw.as_deref(), "plantedDate"))
            .transpose()?,
        harvest_date: input
            .harvest_date
            .map(|raw| parse_date_opt(raw.as_deref(), "harvestDate"))
            .transpose()?,
        sensor_device: input.sensor_device.map(non_blank),
        status: input
            .status
            .as_deref()
            .map(PlantStatus::from_str_db)
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn parse_update(body: serde_json::Value) -> UpdatePlantRequest {
        serde_json::from_value(body).expect("valid update body")
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let absent = parse_update(json!({ "plantName": "Rice" }));
        assert_eq!(absent.farmer_image, None);

        let cleared = parse_update(json!({ "farmerImage": null, "plantedDate": null }));
        assert_eq!(cleared.farmer_image, Some(None));
        assert_eq!(cleared.planted_date, Some(None));
    }

    #[test]
    fn update_clears_and_parses_dates() {
        let update = build_update(parse_update(json!({
            "plantedDate": "2026-03-01T10:00:00Z",
            "harvestDate": null,
            "sensorDevice": "  ",
        })))
        .unwrap();

        assert_eq!(update.planted_date, Some(NaiveDate::from_ymd_opt(2026, 3, 1)));
        assert_eq!(update.harvest_date, Some(None));
        assert_eq!(update.sensor_device, Some(None));
        assert!(update.farm_location.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_body_is_an_empty_update() {
        assert!(build_update(parse_update(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn update_rejects_bad_status_and_blank_name() {
        assert_matches!(
            build_update(parse_update(json!({ "status": "harvested" }))),
            Err(CoreError::Validation(msg)) if msg.starts_with("status must be one of")
        );
        assert_matches!(
            build_update(parse_update(json!({ "plantName": "   " }))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn list_view_omits_unrequested_sensors() {
        let plant = PlantResponse {
            id: 1,
            farmer_image: None,
            farm_location: "Kampot".into(),
            plant_name: "Pepper".into(),
            planted_date: None,
            harvest_date: None,
            sensor_device: None,
            status: PlantStatus::WellPlanted,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let value = serde_json::to_value(PlantView {
            plant,
            latest_sensors: None,
        })
        .unwrap();
        assert_eq!(value["plantName"], "Pepper");
        assert!(value.get("latestSensors").is_none());
    }
}
