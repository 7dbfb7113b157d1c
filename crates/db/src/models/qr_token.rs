//! QR token model and DTOs.

use baitong_core::qr_token::{token_state, QrTokenState};
use baitong_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `qr_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct QrToken {
    pub id: DbId,
    pub plant_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl QrToken {
    pub fn state(&self, now: Timestamp) -> QrTokenState {
        token_state(self.expires_at, self.revoked_at, now)
    }
}

/// Admin-facing listing of a plant's tokens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTokenResponse {
    pub id: DbId,
    pub plant_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub state: QrTokenState,
}

impl QrTokenResponse {
    pub fn from_row(row: &QrToken, now: Timestamp) -> Self {
        Self {
            id: row.id,
            plant_id: row.plant_id,
            token: row.token.clone(),
            expires_at: row.expires_at,
            created_at: row.created_at,
            revoked_at: row.revoked_at,
            state: row.state(now),
        }
    }
}

/// DTO for minting a token.
#[derive(Debug)]
pub struct CreateQrToken {
    pub plant_id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
}
