//! High-level access used by request handlers.

use std::sync::Arc;

use crate::client::InfluxSqlClient;
use crate::config::SensorSettings;
use crate::query::{latest_row_query, measurement_exists_query};
use crate::snapshot::SensorSnapshot;
use crate::source::{DisabledSource, SensorError, SensorSource};

/// Cheap to clone; shares one source across requests.
#[derive(Clone)]
pub struct SensorReader {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn SensorSource>,
    enabled: bool,
    measurement: String,
    allowed_fields: Vec<String>,
    device: Option<String>,
    location: Option<String>,
}

impl SensorReader {
    /// Connect to the configured store, or fall back to [`DisabledSource`].
    pub fn from_settings(settings: &SensorSettings) -> Result<Self, SensorError> {
        let source: Arc<dyn SensorSource> = match &settings.connection {
            Some(connection) => Arc::new(InfluxSqlClient::new(connection)?),
            None => {
                tracing::warn!("INFLUXDB_SQL_ENABLED=false, sensor queries return no data");
                Arc::new(DisabledSource)
            }
        };
        Ok(Self::with_source(source, settings))
    }

    /// Use an explicit source (a stub in tests).
    pub fn with_source(source: Arc<dyn SensorSource>, settings: &SensorSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                enabled: settings.enabled(),
                measurement: settings.measurement.clone(),
                allowed_fields: settings.allowed_fields.clone(),
                device: settings.device.clone(),
                location: settings.location.clone(),
            }),
        }
    }

    pub fn measurement(&self) -> &str {
        &self.inner.measurement
    }

    /// Check once that the configured measurement exists.
    ///
    /// Returns `Ok(false)` when the store answers but has no such table.
    /// A disabled store always passes.
    pub async fn verify_measurement(&self) -> Result<bool, SensorError> {
        if !self.inner.enabled {
            return Ok(true);
        }
        let (sql, params) = measurement_exists_query(&self.inner.measurement);
        let rows = self.inner.source.query(&sql, &params).await?;
        Ok(!rows.is_empty())
    }

    /// Latest row for `device` (or the configured default device), projected
    /// onto the allowed fields. `None` when the measurement has no rows.
    pub async fn latest_snapshot(
        &self,
        device: Option<&str>,
    ) -> Result<Option<SensorSnapshot>, SensorError> {
        let device = device.or(self.inner.device.as_deref());
        let (sql, params) = latest_row_query(
            &self.inner.measurement,
            device,
            self.inner.location.as_deref(),
        );

        let rows = self.inner.source.query(&sql, &params).await?;
        Ok(rows
            .first()
            .map(|row| SensorSnapshot::project_row(row, &self.inner.allowed_fields)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::config::Connection;
    use crate::source::{QueryParams, Row};

    /// Records every query and answers with canned rows.
    #[derive(Default)]
    struct Recording {
        rows: Vec<Row>,
        fail: bool,
        seen: Mutex<Vec<(String, QueryParams)>>,
    }

    #[async_trait]
    impl SensorSource for Recording {
        async fn query(&self, sql: &str, params: &QueryParams) -> Result<Vec<Row>, SensorError> {
            self.seen
                .lock()
                .unwrap()
                .push((sql.to_string(), params.clone()));
            if self.fail {
                return Err(SensorError::Api {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(self.rows.clone())
        }
    }

    fn settings(device: Option<&str>, location: Option<&str>) -> SensorSettings {
        SensorSettings {
            connection: Some(Connection {
                url: "http://influx".into(),
                token: "t".into(),
                database: "farm".into(),
                timeout: std::time::Duration::from_secs(1),
            }),
            measurement: "sensor_data".into(),
            allowed_fields: vec!["moisture".into(), "ph".into()],
            device: device.map(String::from),
            location: location.map(String::from),
        }
    }

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn latest_snapshot_projects_first_row() {
        let source = Arc::new(Recording {
            rows: vec![row(json!({"moisture": 40, "secret": 1, "time": "2026-10-16T08:00:00"}))],
            ..Default::default()
        });
        let reader = SensorReader::with_source(source.clone(), &settings(None, None));

        let snap = reader.latest_snapshot(None).await.unwrap().unwrap();
        assert_eq!(snap.readings.len(), 1);
        assert!(snap.readings.contains_key("moisture"));

        let seen = source.seen.lock().unwrap();
        assert!(seen[0].0.starts_with("SELECT * FROM \"sensor_data\" ORDER BY"));
    }

    #[tokio::test]
    async fn per_plant_device_overrides_default() {
        let source = Arc::new(Recording::default());
        let reader = SensorReader::with_source(source.clone(), &settings(Some("gw-1"), Some("north")));

        assert!(reader.latest_snapshot(Some("esp-7")).await.unwrap().is_none());
        assert!(reader.latest_snapshot(None).await.unwrap().is_none());

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].1["device"], "esp-7");
        assert_eq!(seen[0].1["location"], "north");
        assert_eq!(seen[1].1["device"], "gw-1");
    }

    #[tokio::test]
    async fn source_failures_propagate() {
        let source = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let reader = SensorReader::with_source(source, &settings(None, None));
        assert_matches!(
            reader.latest_snapshot(None).await,
            Err(SensorError::Api { status: 500, .. })
        );
    }

    #[tokio::test]
    async fn verify_measurement_reports_missing_table() {
        let empty = SensorReader::with_source(Arc::new(Recording::default()), &settings(None, None));
        assert!(!empty.verify_measurement().await.unwrap());

        let found = SensorReader::with_source(
            Arc::new(Recording {
                rows: vec![row(json!({"table_name": "sensor_data"}))],
                ..Default::default()
            }),
            &settings(None, None),
        );
        assert!(found.verify_measurement().await.unwrap());
    }

    #[tokio::test]
    async fn disabled_store_skips_verification() {
        let mut s = settings(None, None);
        s.connection = None;
        let reader = SensorReader::with_source(Arc::new(DisabledSource), &s);
        assert!(reader.verify_measurement().await.unwrap());
        assert!(reader.latest_snapshot(None).await.unwrap().is_none());
    }
}
