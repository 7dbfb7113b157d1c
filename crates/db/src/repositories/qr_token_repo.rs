//! Repository for the `qr_tokens` table.

use baitong_core::types::DbId;
use sqlx::PgPool;

use crate::models::qr_token::{CreateQrToken, QrToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, plant_id, token, expires_at, created_at, revoked_at";

/// Provides persistence for plant QR tokens.
pub struct QrTokenRepo;

impl QrTokenRepo {
    /// Insert a new token, returning the created row.
    ///
    /// The `uq_qr_tokens_token` constraint is the authoritative uniqueness guard.
    pub async fn create(pool: &PgPool, input: &CreateQrToken) -> Result<QrToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_tokens (plant_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrToken>(&query)
            .bind(input.plant_id)
            .bind(&input.token)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look a token up by its opaque value, whatever its state.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<QrToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_tokens WHERE token = $1");
        sqlx::query_as::<_, QrToken>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List the tokens minted for a plant, newest first.
    pub async fn list_for_plant(pool: &PgPool, plant_id: DbId) -> Result<Vec<QrToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM qr_tokens WHERE plant_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, QrToken>(&query)
            .bind(plant_id)
            .fetch_all(pool)
            .await
    }

    /// Revoke a token. An already-revoked token keeps its original timestamp.
    ///
    /// Returns the row, or `None` if it does not exist.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<Option<QrToken>, sqlx::Error> {
        let query = format!(
            "UPDATE qr_tokens SET revoked_at = COALESCE(revoked_at, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrToken>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
