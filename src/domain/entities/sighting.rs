use crate::domain::entities::record::SyncPayload;
use crate::domain::value_objects::{EntityKind, Severity};
use serde::{Deserialize, Serialize};

/// A wildlife observation on or near the runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildlifeSighting {
    pub species: String,
    pub count: u32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SyncPayload for WildlifeSighting {
    const KIND: EntityKind = EntityKind::WildlifeSighting;

    fn validate(&self) -> Result<(), String> {
        if self.species.trim().is_empty() {
            return Err("Sighting species cannot be empty".to_string());
        }
        if self.count == 0 {
            return Err("Sighting count must be at least 1".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("Sighting location cannot be empty".to_string());
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

pub(crate) fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), String> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude out of range: {lat}"));
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude out of range: {lon}"));
        }
    }
    Ok(())
}
