use serde::{Deserialize, Serialize};
use std::fmt;

/// The record kinds the engine synchronizes. Kinds are independent: no
/// ordering is guaranteed across them during a sync pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    WildlifeSighting,
    HazardReport,
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::WildlifeSighting,
        EntityKind::HazardReport,
        EntityKind::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::WildlifeSighting => "wildlife_sighting",
            EntityKind::HazardReport => "hazard_report",
            EntityKind::Task => "task",
        }
    }

    /// Remote endpoint path for this kind, relative to the gateway base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntityKind::WildlifeSighting => "/api/sightings",
            EntityKind::HazardReport => "/api/hazard-reports",
            EntityKind::Task => "/api/tasks",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "wildlife_sighting" => Ok(EntityKind::WildlifeSighting),
            "hazard_report" => Ok(EntityKind::HazardReport),
            "task" => Ok(EntityKind::Task),
            other => Err(format!("Unknown entity kind: {other}")),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(EntityKind::parse("chart").is_err());
    }
}
