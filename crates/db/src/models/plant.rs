//! Plant entity model and DTOs.

use baitong_core::error::CoreError;
use baitong_core::plant::PlantStatus;
use baitong_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `plants` table.
#[derive(Debug, Clone, FromRow)]
pub struct Plant {
    pub id: DbId,
    pub farmer_image_url: Option<String>,
    pub farm_location: String,
    pub plant_name: String,
    pub planted_date: Option<Date>,
    pub harvest_date: Option<Date>,
    pub sensor_device: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Plant {
    pub fn status(&self) -> Result<PlantStatus, CoreError> {
        PlantStatus::from_str_db(&self.status)
    }
}

/// Plant representation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantResponse {
    pub id: DbId,
    pub farmer_image: Option<String>,
    pub farm_location: String,
    pub plant_name: String,
    pub planted_date: Option<Date>,
    pub harvest_date: Option<Date>,
    pub sensor_device: Option<String>,
    pub status: PlantStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<&Plant> for PlantResponse {
    type Error = CoreError;

    fn try_from(plant: &Plant) -> Result<Self, Self::Error> {
        Ok(Self {
            id: plant.id,
            farmer_image: plant.farmer_image_url.clone(),
            farm_location: plant.farm_location.clone(),
            plant_name: plant.plant_name.clone(),
            planted_date: plant.planted_date,
            harvest_date: plant.harvest_date,
            sensor_device: plant.sensor_device.clone(),
            status: plant.status()?,
            created_at: plant.created_at,
            updated_at: plant.updated_at,
        })
    }
}

/// DTO for creating a plant. Validation happens before this is built.
#[derive(Debug)]
pub struct CreatePlant {
    pub farmer_image_url: Option<String>,
    pub farm_location: String,
    pub plant_name: String,
    pub planted_date: Option<Date>,
    pub harvest_date: Option<Date>,
    pub sensor_device: Option<String>,
    pub status: PlantStatus,
}

/// DTO for partially updating a plant.
///
/// Nullable columns use `Option<Option<T>>`: the outer `None` keeps the
/// existing value, `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct UpdatePlant {
    pub farmer_image_url: Option<Option<String>>,
    pub farm_location: Option<String>,
    pub plant_name: Option<String>,
    pub planted_date: Option<Option<Date>>,
    pub harvest_date: Option<Option<Date>>,
    pub sensor_device: Option<Option<String>>,
    pub status: Option<PlantStatus>,
}

impl UpdatePlant {
    /// True when no column would change.
    pub fn is_empty(&self) -> bool {
        self.farmer_image_url.is_none()
            && self.farm_location.is_none()
            && self.plant_name.is_none()
            && self.planted_date.is_none()
            && self.harvest_date.is_none()
            && self.sensor_device.is_none()
            && self.status.is_none()
    }
}
