//! Plant registry rules: status values, required fields, date parsing.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Lifecycle status recorded for a plant by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantStatus {
    #[default]
    WellPlanted,
    NotPlanted,
    Died,
}

impl PlantStatus {
    /// Parse a status string from a request body or database row.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "well_planted" => Ok(Self::WellPlanted),
            "not_planted" => Ok(Self::NotPlanted),
            "died" => Ok(Self::Died),
            _ => Err(CoreError::Validation(
                "status must be one of: well_planted, not_planted, died".into(),
            )),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WellPlanted => "well_planted",
            Self::NotPlanted => "not_planted",
            Self::Died => "died",
        }
    }
}

/// Parse an optional status, falling back to [`PlantStatus::WellPlanted`].
///
/// An empty string counts as omitted.
pub fn status_or_default(raw: Option<&str>) -> Result<PlantStatus, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(PlantStatus::default()),
        Some(s) => PlantStatus::from_str_db(s),
    }
}

/// Both the farm location and the plant name must be present and non-blank.
pub fn require_location_and_name<'a>(
    farm_location: Option<&'a str>,
    plant_name: Option<&'a str>,
) -> Result<(&'a str, &'a str), CoreError> {
    let location = farm_location.map(str::trim).filter(|s| !s.is_empty());
    let name = plant_name.map(str::trim).filter(|s| !s.is_empty());
    match (location, name) {
        (Some(location), Some(name)) => Ok((location, name)),
        _ => Err(CoreError::Validation(
            "farmLocation and plantName are required".into(),
        )),
    }
}

/// Parse a planting or harvest date.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (the UTC date part is
/// kept). Blank input means "no date".
pub fn parse_plant_date(raw: &str, field: &str) -> Result<Option<Date>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = Date::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.with_timezone(&chrono::Utc).date_naive()))
        .map_err(|_| {
            CoreError::Validation(format!(
                "{field} must be a date (YYYY-MM-DD) or an RFC 3339 timestamp"
            ))
        })
}
