//! Periodic purge of revocation entries whose tokens have expired.
//!
//! Once a token's `exp` has passed, validation rejects it on its own, so its
//! revocation row can go.

use std::time::Duration;

use baitong_db::repositories::RevokedTokenRepo;
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the cleanup loop every `interval` until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Revocation cleanup job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Revocation cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match RevokedTokenRepo::purge_expired(&pool, Utc::now()).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Revocation cleanup: purged expired entries");
                    }
                    Ok(_) => tracing::debug!("Revocation cleanup: nothing to purge"),
                    Err(e) => {
                        tracing::error!(error = %e, "Revocation cleanup failed");
                    }
                }
            }
        }
    }
}
