//! Coarse crop health assessment from a single sensor snapshot.
//!
//! Only moisture, temperature and pH have ranges; other readings are carried
//! through to clients untouched.

use serde::Serialize;

/// Soil moisture range considered healthy, in percent.
pub const MOISTURE_RANGE: (f64, f64) = (30.0, 80.0);

/// Air/soil temperature range considered healthy, in °C.
pub const TEMPERATURE_RANGE: (f64, f64) = (15.0, 35.0);

/// Soil pH range considered healthy.
pub const PH_RANGE: (f64, f64) = (5.5, 7.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Good,
    Attention,
    NoData,
}

/// Outcome of [`assess`], serialized into the public QR view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropHealth {
    pub level: HealthLevel,
    pub issues: Vec<String>,
}

/// Assess numeric readings keyed by field name.
pub fn assess<'a, I>(readings: I) -> CropHealth
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut seen = false;
    let mut issues = Vec::new();
    let mut assessed: Vec<&str> = Vec::new();

    for (field, value) in readings {
        seen = true;
        let (label, range) = match field {
            "moisture" => ("moisture", MOISTURE_RANGE),
            "temperature" => ("temperature", TEMPERATURE_RANGE),
            "ph" | "pH" => ("pH", PH_RANGE),
            _ => continue,
        };
        // `ph` and `pH` share one range; the first reading wins.
        if assessed.contains(&label) {
            continue;
        }
        assessed.push(label);
        if value < range.0 {
            issues.push(format!("{label} low ({value})"));
        } else if value > range.1 {
            issues.push(format!("{label} high ({value})"));
        }
    }

    let level = if !seen {
        HealthLevel::NoData
    } else if issues.is_empty() {
        HealthLevel::Good
    } else {
        HealthLevel::Attention
    };

    CropHealth { level, issues }
}
