use crate::domain::entities::{SyncPayload, SyncableRecord};
use crate::domain::value_objects::LocalId;
use crate::shared::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable, queryable persistence for one payload kind. The store knows
/// nothing about networking; all mutation of sync state goes through
/// `mark_synced` / `record_failure`.
#[async_trait]
pub trait RecordStore<P: SyncPayload>: Send + Sync {
    /// Insert or update a record keyed by its `local_id`; returns the stored
    /// record as persisted.
    async fn put(&self, record: SyncableRecord<P>) -> Result<SyncableRecord<P>>;

    /// Every record of this kind, in insertion order. Empty, never an error,
    /// when nothing was stored.
    async fn list_all(&self) -> Result<Vec<SyncableRecord<P>>>;

    /// Pending records in insertion (creation) order — the FIFO push order.
    /// Records whose retry backoff has not elapsed at `now` are withheld.
    async fn list_unsynced(&self, now: DateTime<Utc>) -> Result<Vec<SyncableRecord<P>>>;

    /// Live count of pending records; never a cached counter.
    async fn count_pending(&self) -> Result<u64>;

    /// Records parked after permanent failure or an exhausted attempt budget.
    async fn count_needs_review(&self) -> Result<u64>;

    /// Idempotent: marking an already-synced record again is a no-op.
    async fn mark_synced(&self, local_id: &LocalId) -> Result<()>;

    /// Record a failed push attempt. `retry_at` gates the next attempt;
    /// `needs_review` parks the record instead. No-op for synced records.
    async fn record_failure(
        &self,
        local_id: &LocalId,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
        needs_review: bool,
    ) -> Result<()>;

    /// Remove every record of this kind.
    async fn clear(&self) -> Result<()>;
}
