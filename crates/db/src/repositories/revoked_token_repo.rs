//! Repository for the `revoked_tokens` table (session token revocation list).

use baitong_core::types::{DbId, Timestamp};
use sqlx::PgPool;

/// Records and queries revoked session token ids.
pub struct RevokedTokenRepo;

impl RevokedTokenRepo {
    /// Add a token id to the revocation list.
    ///
    /// Revoking an already-revoked id is a no-op. Returns `true` if a new
    /// row was written.
    pub async fn revoke(
        pool: &PgPool,
        jti: &str,
        user_id: Option<DbId>,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO revoked_tokens (jti, user_id, expires_at)
             VALUES ($1, (SELECT id FROM users WHERE id = $2), $3)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a token id has been revoked.
    pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
        let (revoked,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(pool)
                .await?;
        Ok(revoked)
    }

    /// Delete entries whose token would already fail expiry validation.
    ///
    /// Returns the count of deleted rows.
    pub async fn purge_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
