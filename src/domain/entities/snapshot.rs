use crate::domain::entities::{HazardReport, SyncableRecord, Task, WildlifeSighting};
use serde::{Deserialize, Serialize};

/// Everything currently held in the local store, per entity kind. Built for
/// display; the orchestrator never mutates through it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfflineSnapshot {
    pub sightings: Vec<SyncableRecord<WildlifeSighting>>,
    pub hazard_reports: Vec<SyncableRecord<HazardReport>>,
    pub tasks: Vec<SyncableRecord<Task>>,
}

impl OfflineSnapshot {
    pub fn total(&self) -> usize {
        self.sightings.len() + self.hazard_reports.len() + self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub synced_count: u32,
    pub failed_count: u32,
    pub pending_count: u64,
    /// True when the pass lost the mutual-exclusion race and did nothing.
    pub skipped: bool,
}

impl SyncReport {
    pub fn new(synced_count: u32, failed_count: u32, pending_count: u64) -> Self {
        Self {
            synced_count,
            failed_count,
            pending_count,
            skipped: false,
        }
    }

    pub fn skipped() -> Self {
        Self {
            synced_count: 0,
            failed_count: 0,
            pending_count: 0,
            skipped: true,
        }
    }
}
