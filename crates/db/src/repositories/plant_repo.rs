//! Repository for the `plants` table.

use baitong_core::types::DbId;
use sqlx::PgPool;

use crate::models::plant::{CreatePlant, Plant, UpdatePlant};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, farmer_image_url, farm_location, plant_name, planted_date, \
                        harvest_date, sensor_device, status, created_at, updated_at";

/// Provides CRUD operations for plants.
pub struct PlantRepo;

impl PlantRepo {
    /// Insert a new plant, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePlant) -> Result<Plant, sqlx::Error> {
        let query = format!(
            "INSERT INTO plants (farmer_image_url, farm_location, plant_name, planted_date, \
                                 harvest_date, sensor_device, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plant>(&query)
            .bind(&input.farmer_image_url)
            .bind(&input.farm_location)
            .bind(&input.plant_name)
            .bind(input.planted_date)
            .bind(input.harvest_date)
            .bind(&input.sensor_device)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a plant by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plants WHERE id = $1");
        sqlx::query_as::<_, Plant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all plants, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Plant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plants ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Plant>(&query).fetch_all(pool).await
    }

    /// Partially update a plant.
    ///
    /// Non-nullable columns use `COALESCE`; nullable columns use a
    /// "provided" flag so that an explicit `null` clears the value.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlant,
    ) -> Result<Option<Plant>, sqlx::Error> {
        let query = format!(
            "UPDATE plants SET
                farmer_image_url = CASE WHEN $2 THEN $3 ELSE farmer_image_url END,
                farm_location    = COALESCE($4, farm_location),
                plant_name       = COALESCE($5, plant_name),
                planted_date     = CASE WHEN $6 THEN $7 ELSE planted_date END,
                harvest_date     = CASE WHEN $8 THEN $9 ELSE harvest_date END,
                sensor_device    = CASE WHEN $10 THEN $11 ELSE sensor_device END,
                status           = COALESCE($12, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plant>(&query)
            .bind(id)
            .bind(input.farmer_image_url.is_some())
            .bind(input.farmer_image_url.clone().flatten())
            .bind(&input.farm_location)
            .bind(&input.plant_name)
            .bind(input.planted_date.is_some())
            .bind(input.planted_date.flatten())
            .bind(input.harvest_date.is_some())
            .bind(input.harvest_date.flatten())
            .bind(input.sensor_device.is_some())
            .bind(input.sensor_device.clone().flatten())
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a plant. QR tokens referencing it go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
