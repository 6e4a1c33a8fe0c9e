use crate::domain::entities::record::SyncPayload;
use crate::domain::entities::sighting::validate_coordinates;
use crate::domain::value_objects::{EntityKind, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl fmt::Display for HazardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HazardStatus::Open => "open",
            HazardStatus::InProgress => "in_progress",
            HazardStatus::Resolved => "resolved",
            HazardStatus::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// A reported hazard on the maneuvering area (FOD, surface damage, spills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub severity: Severity,
    pub priority: HazardPriority,
    pub status: HazardStatus,
}

impl SyncPayload for HazardReport {
    const KIND: EntityKind = EntityKind::HazardReport;

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Hazard title cannot be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Hazard description cannot be empty".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("Hazard location cannot be empty".to_string());
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> HazardReport {
        HazardReport {
            title: "FOD na pisti".to_string(),
            description: "Metalni ulomak kod praga 09".to_string(),
            location: "Pista 09/27".to_string(),
            latitude: None,
            longitude: None,
            severity: Severity::Critical,
            priority: HazardPriority::Urgent,
            status: HazardStatus::Open,
        }
    }

    #[test]
    fn valid_report_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut r = valid();
        r.title = "   ".to_string();
        assert!(r.validate().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(&valid()).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["priority"], "urgent");
    }
}
