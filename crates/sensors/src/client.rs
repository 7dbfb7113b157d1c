//! HTTP client for the InfluxDB 3 SQL endpoint.
//!
//! Wraps `POST /api/v3/query_sql` using [`reqwest`]. Results are requested
//! as `format=json`, which the server returns as an array of row objects.

use async_trait::async_trait;

use crate::config::Connection;
use crate::source::{QueryParams, Row, SensorError, SensorSource};

/// HTTP client for a single time-series database.
pub struct InfluxSqlClient {
    client: reqwest::Client,
    url: String,
    token: String,
    database: String,
}

impl InfluxSqlClient {
    /// Create a client with its own connection pool and request timeout.
    pub fn new(connection: &Connection) -> Result<Self, SensorError> {
        let client = reqwest::Client::builder()
            .timeout(connection.timeout)
            .build()?;
        Ok(Self::with_client(client, connection))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, connection: &Connection) -> Self {
        Self {
            client,
            url: connection.url.clone(),
            token: connection.token.clone(),
            database: connection.database.clone(),
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or turn it into
    /// [`SensorError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, SensorError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SensorError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SensorSource for InfluxSqlClient {
    async fn query(&self, sql: &str, params: &QueryParams) -> Result<Vec<Row>, SensorError> {
        let mut body = serde_json::json!({
            "db": self.database,
            "q": sql,
            "format": "json",
        });
        if !params.is_empty() {
            body["params"] = serde_json::Value::Object(params.clone());
        }

        tracing::debug!(sql, "Querying time-series store");

        let response = self
            .client
            .post(format!("{}/api/v3/query_sql", self.url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        decode_rows(&text)
    }
}

/// Decode a `format=json` body. An empty body means no rows.
pub(crate) fn decode_rows(text: &str) -> Result<Vec<Row>, SensorError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| SensorError::Decode(e.to_string()))?;
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::Object(row) => Ok(row),
                other => Err(SensorError::Decode(format!("expected object row, got {other}"))),
            })
            .collect(),
        other => Err(SensorError::Decode(format!("expected array of rows, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decodes_row_array() {
        let rows = decode_rows(r#"[{"moisture":41.5,"time":"2026-10-16T08:00:00"}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["moisture"], 41.5);
    }

    #[test]
    fn empty_body_is_no_rows() {
        assert!(decode_rows("").unwrap().is_empty());
        assert!(decode_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array_bodies() {
        assert_matches!(decode_rows(r#"{"error":"x"}"#), Err(SensorError::Decode(_)));
        assert_matches!(decode_rows("[1,2]"), Err(SensorError::Decode(_)));
        assert_matches!(decode_rows("not json"), Err(SensorError::Decode(_)));
    }
}
