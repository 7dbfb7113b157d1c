//! The seam between the reader and whatever executes SQL.

use async_trait::async_trait;

/// One result row, column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Named `$parameters` bound into a query.
pub type QueryParams = serde_json::Map<String, serde_json::Value>;

/// Errors from the time-series layer.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("Time-series API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not a JSON array of objects.
    #[error("Unexpected time-series response: {0}")]
    Decode(String),
}

/// Executes a read-only SQL statement against the time-series store.
#[async_trait]
pub trait SensorSource: Send + Sync {
    async fn query(&self, sql: &str, params: &QueryParams) -> Result<Vec<Row>, SensorError>;
}

/// Stand-in used when the time-series store is switched off: every query
/// returns no rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSource;

#[async_trait]
impl SensorSource for DisabledSource {
    async fn query(&self, _sql: &str, _params: &QueryParams) -> Result<Vec<Row>, SensorError> {
        Ok(Vec::new())
    }
}
