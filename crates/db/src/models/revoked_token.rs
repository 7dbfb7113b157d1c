//! Revocation list entry model.

use baitong_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `revoked_tokens` table.
///
/// `expires_at` mirrors the revoked token's own `exp`, so the row can be
/// purged once the token would have been rejected anyway.
#[derive(Debug, Clone, FromRow)]
pub struct RevokedToken {
    pub id: DbId,
    pub jti: String,
    pub user_id: Option<DbId>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
