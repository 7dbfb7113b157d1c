//! Projection of the newest measurement row onto the exposed fields.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use baitong_core::sensor_fields::unit_for;

use crate::source::Row;

/// One field of the latest row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub value: Value,
    pub time: Option<String>,
    pub unit: &'static str,
}

/// The latest reading of every allowed field present in the newest row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pub readings: BTreeMap<String, Reading>,
    pub location: Option<Value>,
    pub device: Option<Value>,
    pub recorded_at: Option<String>,
}

impl SensorSnapshot {
    /// Keep only `allowed` fields of `row`. Other columns never leave this
    /// function.
    pub fn project_row(row: &Row, allowed: &[String]) -> Self {
        let recorded_at = row.get("time").and_then(normalize_time);

        let readings = allowed
            .iter()
            .filter_map(|field| {
                let value = row.get(field.as_str())?;
                Some((
                    field.clone(),
                    Reading {
                        value: value.clone(),
                        time: recorded_at.clone(),
                        unit: unit_for(field),
                    },
                ))
            })
            .collect();

        Self {
            readings,
            location: row.get("location").filter(|v| !v.is_null()).cloned(),
            device: row.get("device").filter(|v| !v.is_null()).cloned(),
            recorded_at,
        }
    }

    /// Readings that carry a number, for health assessment.
    pub fn numeric_readings(&self) -> impl Iterator<Item = (&str, f64)> {
        self.readings
            .iter()
            .filter_map(|(field, reading)| as_number(&reading.value).map(|v| (field.as_str(), v)))
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// The store reports `time` as naive UTC (`2026-10-16T08:00:00.123`) or as
/// epoch nanoseconds. Both become RFC 3339 in UTC; anything else passes
/// through as text.
fn normalize_time(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.with_timezone(&Utc).to_rfc3339());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc().to_rfc3339());
            }
            Some(raw.clone())
        }
        Value::Number(n) => n
            .as_i64()
            .map(|nanos| DateTime::<Utc>::from_timestamp_nanos(nanos).to_rfc3339()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn allowed(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn projects_only_allowed_fields() {
        let r = row(json!({
            "time": "2026-10-16T08:00:00",
            "moisture": 41.5,
            "temperature": 27,
            "secret_column": "x",
            "location": "plot-a",
            "device": "esp32-01"
        }));
        let snap = SensorSnapshot::project_row(&r, &allowed(&["moisture", "ph", "temperature"]));

        assert_eq!(snap.readings.len(), 2);
        assert!(!snap.readings.contains_key("secret_column"));
        assert!(!snap.readings.contains_key("ph"));
        assert_eq!(snap.readings["moisture"].unit, "%");
        assert_eq!(snap.readings["temperature"].value, json!(27));
        assert_eq!(snap.location, Some(json!("plot-a")));
        assert_eq!(snap.device, Some(json!("esp32-01")));
        assert_eq!(snap.recorded_at.as_deref(), Some("2026-10-16T08:00:00+00:00"));
        assert_eq!(snap.readings["moisture"].time, snap.recorded_at);
    }

    #[test]
    fn numeric_readings_skip_text() {
        let r = row(json!({"moisture": "55.5", "ph": "n/a", "ec": 120}));
        let snap = SensorSnapshot::project_row(&r, &allowed(&["moisture", "ph", "ec"]));
        let nums: Vec<_> = snap.numeric_readings().collect();
        assert_eq!(nums, vec![("ec", 120.0), ("moisture", 55.5)]);
    }

    #[test]
    fn time_forms() {
        assert_eq!(
            normalize_time(&json!("2026-10-16T15:00:00+07:00")).as_deref(),
            Some("2026-10-16T08:00:00+00:00")
        );
        assert_eq!(
            normalize_time(&json!(0)).as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
        assert_eq!(normalize_time(&json!("yesterday")).as_deref(), Some("yesterday"));
        assert_eq!(normalize_time(&Value::Null), None);
    }

    #[test]
    fn serializes_camel_case() {
        let snap = SensorSnapshot::project_row(&row(json!({"time": "2026-10-16T08:00:00"})), &[]);
        let value = serde_json::to_value(&snap).unwrap();
        assert!(value.get("recordedAt").is_some());
        assert_eq!(value["readings"], json!({}));
    }
}
