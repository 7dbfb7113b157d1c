use std::sync::Arc;

use baitong_sensors::SensorReader;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: baitong_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Latest-reading access to the time-series store.
    pub sensors: SensorReader,
}
