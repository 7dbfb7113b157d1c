//! Handlers for QR tokens: minting, revocation, listing and the public scan.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use baitong_core::crop_health::{assess, CropHealth};
use baitong_core::error::CoreError;
use baitong_core::plant::PlantStatus;
use baitong_core::qr_token::{ensure_scannable, generate_token, scan_url, INVALID_TOKEN};
use baitong_core::types::{Date, DbId, Timestamp};
use baitong_db::models::qr_token::{CreateQrToken, QrTokenResponse};
use baitong_db::repositories::{PlantRepo, QrTokenRepo};
use baitong_sensors::Reading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::qr_image::svg_data_url;
use crate::response::DataResponse;
use crate::state::AppState;

pub const PLANT_NOT_FOUND_FOR_TOKEN: &str = "Plant not found for token";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /qr/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest {
    pub plant_id: Option<DbId>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQr {
    pub id: DbId,
    pub plant_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub url: String,
    pub qr_data_url: String,
}

/// Public view of the plant behind a scanned token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMeta {
    pub farmer_image: Option<String>,
    pub farm_location: String,
    pub plant_name: String,
    pub planted_date: Option<Date>,
    pub harvest_date: Option<Date>,
    pub plant_status: PlantStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanQrInfo {
    pub expires_at: Timestamp,
    pub valid: bool,
}

/// Response body for `GET /qr/scan/{token}`.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub success: bool,
    pub meta: ScanMeta,
    pub status: CropHealth,
    pub data: BTreeMap<String, Reading>,
    pub location: Option<serde_json::Value>,
    pub qr: ScanQrInfo,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/qr/generate
///
/// Mint a token for a plant and render its scan URL as a QR image.
pub async fn generate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<GenerateQrRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GeneratedQr>>)> {
    let raw_expiry = input.expires_at.as_deref().map(str::trim).unwrap_or_default();
    let plant_id = match input.plant_id {
        Some(id) if !raw_expiry.is_empty() => id,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "plantId and expiresAt are required".into(),
            )))
        }
    };
    let expires_at = DateTime::parse_from_rfc3339(raw_expiry)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Core(CoreError::Validation(
                "expiresAt must be an RFC 3339 timestamp".into(),
            ))
        })?;

    if PlantRepo::find_by_id(&state.pool, plant_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Plant",
            id: plant_id,
        }));
    }

    let token = generate_token();
    let url = scan_url(&state.config.qr_base_url, &token);
    let qr_data_url = svg_data_url(&url)
        .map_err(|e| AppError::InternalError(format!("QR rendering error: {e}")))?;

    let row = QrTokenRepo::create(
        &state.pool,
        &CreateQrToken {
            plant_id,
            token,
            expires_at,
        },
    )
    .await?;

    tracing::info!(qr_token_id = row.id, plant_id, issued_by = user.user_id, "QR token issued");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(GeneratedQr {
            id: row.id,
            plant_id: row.plant_id,
            token: row.token,
            expires_at: row.expires_at,
            url,
            qr_data_url,
        })),
    ))
}

/// POST /api/qr/tokens/{id}/revoke
///
/// Idempotent: an already revoked token keeps its original `revokedAt`.
pub async fn revoke(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<QrTokenResponse>>> {
    let row = QrTokenRepo::revoke(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QR token",
            id,
        }))?;

    tracing::info!(qr_token_id = id, revoked_by = admin.user_id, "QR token revoked");

    Ok(Json(DataResponse::new(QrTokenResponse::from_row(
        &row,
        Utc::now(),
    ))))
}

/// GET /api/plants/{id}/qr-tokens
pub async fn list_for_plant(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(plant_id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<QrTokenResponse>>>> {
    if PlantRepo::find_by_id(&state.pool, plant_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Plant",
            id: plant_id,
        }));
    }

    let now = Utc::now();
    let tokens = QrTokenRepo::list_for_plant(&state.pool, plant_id)
        .await?
        .iter()
        .map(|row| QrTokenResponse::from_row(row, now))
        .collect();

    Ok(Json(DataResponse::new(tokens)))
}

/// GET /api/qr/scan/{token}
///
/// Public. Unknown and revoked tokens are indistinguishable; expired tokens
/// answer 410 with their expiry.
pub async fn scan(
    State(state): State<AppState>,
    ApiPath(token): ApiPath<String>,
) -> AppResult<Json<ScanResponse>> {
    let qr = QrTokenRepo::find_by_token(&state.pool, &token)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFoundMessage(INVALID_TOKEN.into())))?;

    let now = Utc::now();
    ensure_scannable(qr.expires_at, qr.revoked_at, now)?;

    let plant = PlantRepo::find_by_id(&state.pool, qr.plant_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage(PLANT_NOT_FOUND_FOR_TOKEN.into()))
        })?;

    let snapshot = state
        .sensors
        .latest_snapshot(plant.sensor_device.as_deref())
        .await?;

    let status = match &snapshot {
        Some(snapshot) => assess(snapshot.numeric_readings()),
        None => assess(std::iter::empty()),
    };
    let (data, location) = match snapshot {
        Some(snapshot) => (snapshot.readings, snapshot.location),
        None => (BTreeMap::new(), None),
    };

    Ok(Json(ScanResponse {
        success: true,
        meta: ScanMeta {
            plant_status: plant.status()?,
            farmer_image: plant.farmer_image_url,
            farm_location: plant.farm_location,
            plant_name: plant.plant_name,
            planted_date: plant.planted_date,
            harvest_date: plant.harvest_date,
        },
        status,
        data,
        location,
        qr: ScanQrInfo {
            expires_at: qr.expires_at,
            valid: true,
        },
        timestamp: now,
    }))
}
