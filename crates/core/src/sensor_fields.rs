//! The fixed set of sensor field names the system will ever expose.
//!
//! Configured field lists are checked against this set so that neither a
//! query nor a response can reach arbitrary columns of the measurement.

use crate::error::CoreError;

/// Field names readable from the time-series store.
pub const KNOWN_SENSOR_FIELDS: [&str; 9] = [
    "temperature",
    "moisture",
    "ec",
    "ph",
    "pH",
    "nitrogen",
    "phosphorus",
    "potassium",
    "salinity",
];

/// Display unit for a known field. Unknown fields have no unit.
pub fn unit_for(field: &str) -> &'static str {
    match field {
        "temperature" => "°C",
        "moisture" => "%",
        "ec" => "µS/cm",
        "nitrogen" | "phosphorus" | "potassium" => "mg/kg",
        "salinity" => "ppt",
        _ => "",
    }
}

/// Validate a configured allow-list against [`KNOWN_SENSOR_FIELDS`].
///
/// Blank entries are dropped and duplicates collapsed; order is preserved.
pub fn validate_allowed_fields<I, S>(fields: I) -> Result<Vec<String>, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut allowed: Vec<String> = Vec::new();
    for field in fields {
        let field = field.as_ref().trim();
        if field.is_empty() {
            continue;
        }
        if !KNOWN_SENSOR_FIELDS.contains(&field) {
            return Err(CoreError::Validation(format!(
                "Unknown sensor field '{field}'. Must be one of: {}",
                KNOWN_SENSOR_FIELDS.join(", ")
            )));
        }
        if !allowed.iter().any(|f| f == field) {
            allowed.push(field.to_string());
        }
    }
    if allowed.is_empty() {
        return Err(CoreError::Validation(
            "At least one sensor field must be allowed".into(),
        ));
    }
    Ok(allowed)
}
