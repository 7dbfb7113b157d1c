//! Time-series settings, read from `INFLUXDB_*` environment variables.

use std::time::Duration;

use baitong_core::sensor_fields::{validate_allowed_fields, KNOWN_SENSOR_FIELDS};

use crate::query::is_identifier;

/// Measurement queried when `INFLUXDB_MEASUREMENT` is unset.
pub const DEFAULT_MEASUREMENT: &str = "sensor_data";

/// Per-request timeout when `INFLUXDB_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum SensorConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection details for the SQL endpoint. Only present when enabled.
#[derive(Debug, Clone)]
pub struct Connection {
    pub url: String,
    pub token: String,
    pub database: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SensorSettings {
    /// `None` when `INFLUXDB_SQL_ENABLED=false`.
    pub connection: Option<Connection>,
    pub measurement: String,
    pub allowed_fields: Vec<String>,
    /// Optional `device` tag filter for the global snapshot.
    pub device: Option<String>,
    /// Optional `location` tag filter applied to every snapshot.
    pub location: Option<String>,
}

impl SensorSettings {
    /// Build settings from an arbitrary variable lookup.
    pub fn from_vars<F>(get: F) -> Result<Self, SensorConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let enabled = !non_empty("INFLUXDB_SQL_ENABLED")
            .is_some_and(|v| v.eq_ignore_ascii_case("false"));

        let connection = if enabled {
            let url = non_empty("INFLUXDB_URL").ok_or(SensorConfigError::Missing("INFLUXDB_URL"))?;
            let token =
                non_empty("INFLUXDB_TOKEN").ok_or(SensorConfigError::Missing("INFLUXDB_TOKEN"))?;
            let database = non_empty("INFLUXDB_DATABASE")
                .or_else(|| non_empty("INFLUXDB_BUCKET"))
                .ok_or(SensorConfigError::Missing("INFLUXDB_DATABASE"))?;
            let timeout_secs = match non_empty("INFLUXDB_TIMEOUT_SECS") {
                Some(raw) => raw.parse::<u64>().map_err(|e| SensorConfigError::Invalid {
                    var: "INFLUXDB_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            };
            Some(Connection {
                url: url.trim_end_matches('/').to_string(),
                token,
                database,
                timeout: Duration::from_secs(timeout_secs),
            })
        } else {
            None
        };

        let measurement =
            non_empty("INFLUXDB_MEASUREMENT").unwrap_or_else(|| DEFAULT_MEASUREMENT.to_string());
        if !is_identifier(&measurement) {
            return Err(SensorConfigError::Invalid {
                var: "INFLUXDB_MEASUREMENT",
                reason: format!("'{measurement}' is not a plain identifier"),
            });
        }

        let allowed_fields = match non_empty("INFLUXDB_ALLOWED_FIELDS") {
            Some(raw) => validate_allowed_fields(raw.split(',')).map_err(|e| {
                SensorConfigError::Invalid {
                    var: "INFLUXDB_ALLOWED_FIELDS",
                    reason: e.to_string(),
                }
            })?,
            None => KNOWN_SENSOR_FIELDS.iter().map(|f| f.to_string()).collect(),
        };

        Ok(Self {
            connection,
            measurement,
            allowed_fields,
            device: non_empty("INFLUXDB_DEVICE"),
            location: non_empty("INFLUXDB_LOCATION"),
        })
    }

    pub fn enabled(&self) -> bool {
        self.connection.is_some()
    }
}
