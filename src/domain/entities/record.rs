use crate::domain::value_objects::{EntityKind, LocalId, SyncState};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A domain payload the engine can store and push.
pub trait SyncPayload:
    Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn validate(&self) -> Result<(), String>;
}

/// The synchronization envelope wrapped around every domain payload.
///
/// Invariants: `local_id` is immutable once assigned; `updated_at` is
/// monotonically non-decreasing; `synced` transitions only `false -> true`,
/// and only on a confirmed remote acknowledgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncableRecord<P> {
    pub local_id: LocalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced: bool,
    pub state: SyncState,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub payload: P,
}

impl<P: SyncPayload> SyncableRecord<P> {
    pub fn new(payload: P) -> Self {
        let now = Utc::now();
        Self {
            local_id: LocalId::generate(),
            created_at: now,
            updated_at: now,
            synced: false,
            state: SyncState::Pending,
            attempts: 0,
            last_error: None,
            payload,
        }
    }

    pub fn kind(&self) -> EntityKind {
        P::KIND
    }

    pub fn is_pending(&self) -> bool {
        self.state == SyncState::Pending
    }

    /// Bump `updated_at` for a local mutation, clamped so it never moves
    /// backwards under clock skew.
    pub fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    pub fn mark_synced(&mut self) {
        self.synced = true;
        self.state = SyncState::Synced;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: &str, needs_review: bool) {
        self.attempts += 1;
        self.last_error = Some(error.to_string());
        if needs_review {
            self.state = SyncState::NeedsReview;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::WildlifeSighting;
    use crate::domain::value_objects::Severity;

    fn sighting() -> WildlifeSighting {
        WildlifeSighting {
            species: "Galeb".to_string(),
            count: 5,
            location: "Pista 27".to_string(),
            latitude: None,
            longitude: None,
            severity: Severity::Medium,
            notes: None,
        }
    }

    #[test]
    fn new_record_is_pending_and_unsynced() {
        let record = SyncableRecord::new(sighting());
        assert!(!record.synced);
        assert_eq!(record.state, SyncState::Pending);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut record = SyncableRecord::new(sighting());
        let before = record.updated_at;
        record.touch();
        assert!(record.updated_at >= before);
    }

    #[test]
    fn mark_synced_clears_last_error() {
        let mut record = SyncableRecord::new(sighting());
        record.record_failure("remote returned 503", false);
        assert_eq!(record.attempts, 1);
        assert!(record.last_error.is_some());
        assert_eq!(record.state, SyncState::Pending);

        record.mark_synced();
        assert!(record.synced);
        assert_eq!(record.state, SyncState::Synced);
        assert!(record.last_error.is_none());
    }

    #[test]
    fn permanent_failure_parks_the_record() {
        let mut record = SyncableRecord::new(sighting());
        record.record_failure("remote returned 422", true);
        assert_eq!(record.state, SyncState::NeedsReview);
        assert!(!record.synced);
    }
}
