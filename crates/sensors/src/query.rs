//! SQL text for the time-series store.
//!
//! Identifiers cannot be bound as parameters, so the measurement name is
//! checked against [`IDENTIFIER_PATTERN`] before it is ever interpolated.
//! Tag filter values always travel as `$device` / `$location` parameters.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::source::QueryParams;

pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENTIFIER_PATTERN).expect("valid regex"));

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Query for the most recent row of `measurement`, optionally narrowed by
/// device and location tags.
///
/// The caller must have validated `measurement` with [`is_identifier`].
pub fn latest_row_query(
    measurement: &str,
    device: Option<&str>,
    location: Option<&str>,
) -> (String, QueryParams) {
    let mut filters = Vec::new();
    let mut params = QueryParams::new();

    if let Some(device) = device {
        filters.push("device = $device");
        params.insert("device".into(), Value::String(device.to_string()));
    }
    if let Some(location) = location {
        filters.push("location = $location");
        params.insert("location".into(), Value::String(location.to_string()));
    }

    let where_clause = if filters.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", filters.join(" AND "))
    };

    let sql = format!("SELECT * FROM \"{measurement}\"{where_clause} ORDER BY time DESC LIMIT 1");
    (sql, params)
}

/// Query returning one row if `measurement` exists in the database.
pub fn measurement_exists_query(measurement: &str) -> (String, QueryParams) {
    let mut params = QueryParams::new();
    params.insert("measurement".into(), Value::String(measurement.to_string()));
    (
        "SELECT table_name FROM information_schema.tables WHERE table_name = $measurement LIMIT 1"
            .to_string(),
        params,
    )
}
