use crate::application::ports::RecordStore;
use crate::domain::entities::{SyncPayload, SyncableRecord};
use crate::domain::value_objects::{LocalId, SyncState};
use crate::infrastructure::offline::mappers::{millis, record_from_row};
use crate::infrastructure::offline::rows::OfflineRecordRow;
use crate::shared::error::{Result, SyncError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// One table for every entity kind, discriminated by `entity_kind`, payload
/// as JSON. Insertion order (the autoincrement id) is the FIFO push order.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_by_local_id<P: SyncPayload>(
        &self,
        local_id: &LocalId,
    ) -> Result<SyncableRecord<P>> {
        let row = sqlx::query_as::<_, OfflineRecordRow>(
            "SELECT * FROM offline_records WHERE local_id = ?1 AND entity_kind = ?2",
        )
        .bind(local_id.as_str())
        .bind(P::KIND.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| SyncError::Storage(format!("Record {local_id} not found after write")))?;

        record_from_row(row)
    }
}

#[async_trait]
impl<P: SyncPayload> RecordStore<P> for SqliteRecordStore {
    async fn put(&self, record: SyncableRecord<P>) -> Result<SyncableRecord<P>> {
        let payload = serde_json::to_string(&record.payload)?;

        sqlx::query(
            r#"
            INSERT INTO offline_records (
                local_id, entity_kind, payload, is_synced, status,
                attempts, last_error, next_retry_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)
            ON CONFLICT(local_id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = MAX(offline_records.updated_at, excluded.updated_at)
            "#,
        )
        .bind(record.local_id.as_str())
        .bind(P::KIND.as_str())
        .bind(&payload)
        .bind(record.synced)
        .bind(record.state.as_str())
        .bind(record.attempts as i64)
        .bind(&record.last_error)
        .bind(millis(record.created_at))
        .bind(millis(record.updated_at))
        .execute(&self.pool)
        .await?;

        self.fetch_by_local_id::<P>(&record.local_id).await
    }

    async fn list_all(&self) -> Result<Vec<SyncableRecord<P>>> {
        let rows = sqlx::query_as::<_, OfflineRecordRow>(
            "SELECT * FROM offline_records WHERE entity_kind = ?1 ORDER BY id ASC",
        )
        .bind(P::KIND.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn list_unsynced(&self, now: DateTime<Utc>) -> Result<Vec<SyncableRecord<P>>> {
        let rows = sqlx::query_as::<_, OfflineRecordRow>(
            r#"
            SELECT * FROM offline_records
            WHERE entity_kind = ?1 AND status = ?2
              AND (next_retry_at IS NULL OR next_retry_at <= ?3)
            ORDER BY id ASC
            "#,
        )
        .bind(P::KIND.as_str())
        .bind(SyncState::Pending.as_str())
        .bind(millis(now))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn count_pending(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM offline_records WHERE entity_kind = ?1 AND status = ?2",
        )
        .bind(P::KIND.as_str())
        .bind(SyncState::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn count_needs_review(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM offline_records WHERE entity_kind = ?1 AND status = ?2",
        )
        .bind(P::KIND.as_str())
        .bind(SyncState::NeedsReview.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn mark_synced(&self, local_id: &LocalId) -> Result<()> {
        // The is_synced guard makes repeated calls no-ops and keeps the
        // original synced_at.
        sqlx::query(
            r#"
            UPDATE offline_records
            SET is_synced = 1, status = ?1, synced_at = ?2, last_error = NULL
            WHERE local_id = ?3 AND entity_kind = ?4 AND is_synced = 0
            "#,
        )
        .bind(SyncState::Synced.as_str())
        .bind(millis(Utc::now()))
        .bind(local_id.as_str())
        .bind(P::KIND.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_failure(
        &self,
        local_id: &LocalId,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
        needs_review: bool,
    ) -> Result<()> {
        let status = if needs_review {
            SyncState::NeedsReview
        } else {
            SyncState::Pending
        };

        sqlx::query(
            r#"
            UPDATE offline_records
            SET attempts = attempts + 1,
                last_error = ?1,
                next_retry_at = ?2,
                status = ?3
            WHERE local_id = ?4 AND entity_kind = ?5 AND is_synced = 0
            "#,
        )
        .bind(error)
        .bind(retry_at.map(millis))
        .bind(status.as_str())
        .bind(local_id.as_str())
        .bind(P::KIND.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM offline_records WHERE entity_kind = ?1")
            .bind(P::KIND.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Task, TaskPriority, TaskStatus, TaskType, WildlifeSighting};
    use crate::domain::value_objects::Severity;
    use crate::infrastructure::database::ConnectionPool;

    async fn setup_store() -> SqliteRecordStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.initialize().await.unwrap();
        SqliteRecordStore::new(pool.get_pool().clone())
    }

    fn sighting(species: &str) -> SyncableRecord<WildlifeSighting> {
        SyncableRecord::new(WildlifeSighting {
            species: species.to_string(),
            count: 3,
            location: "Pista 27".to_string(),
            latitude: None,
            longitude: None,
            severity: Severity::Low,
            notes: None,
        })
    }

    fn task(title: &str) -> SyncableRecord<Task> {
        SyncableRecord::new(Task {
            title: title.to_string(),
            description: None,
            task_type: TaskType::Weekly,
            priority: TaskPriority::Low,
            status: TaskStatus::Pending,
            due_date: None,
            completed_at: None,
        })
    }

    #[tokio::test]
    async fn put_round_trips_the_record() {
        let store = setup_store().await;

        let record = sighting("Galeb");
        let stored = store.put(record.clone()).await.unwrap();

        assert_eq!(stored.local_id, record.local_id);
        assert_eq!(stored.payload, record.payload);
        assert!(!stored.synced);
        assert_eq!(stored.state, SyncState::Pending);
    }

    #[tokio::test]
    async fn put_upserts_by_local_id() {
        let store = setup_store().await;

        let mut record = store.put(sighting("Galeb")).await.unwrap();
        record.payload.count = 9;
        record.touch();
        store.put(record.clone()).await.unwrap();

        let all: Vec<SyncableRecord<WildlifeSighting>> = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].payload.count, 9);
        assert!(all[0].updated_at >= all[0].created_at);
    }

    #[tokio::test]
    async fn list_unsynced_is_fifo_and_skips_synced() {
        let store = setup_store().await;

        let a = store.put(sighting("Galeb")).await.unwrap();
        let b = store.put(sighting("Vrana")).await.unwrap();
        let c = store.put(sighting("Roda")).await.unwrap();

        RecordStore::<WildlifeSighting>::mark_synced(&store, &b.local_id)
            .await
            .unwrap();

        let pending: Vec<SyncableRecord<WildlifeSighting>> =
            store.list_unsynced(Utc::now()).await.unwrap();
        let ids: Vec<_> = pending.iter().map(|r| r.local_id.clone()).collect();
        assert_eq!(ids, vec![a.local_id, c.local_id]);
    }

    #[tokio::test]
    async fn list_unsynced_withholds_backoff_gated_records() {
        let store = setup_store().await;
        let record = store.put(sighting("Galeb")).await.unwrap();

        let retry_at = Utc::now() + chrono::Duration::minutes(5);
        RecordStore::<WildlifeSighting>::record_failure(
            &store,
            &record.local_id,
            "remote returned 503",
            Some(retry_at),
            false,
        )
        .await
        .unwrap();

        let now: Vec<SyncableRecord<WildlifeSighting>> =
            store.list_unsynced(Utc::now()).await.unwrap();
        assert!(now.is_empty());

        let later: Vec<SyncableRecord<WildlifeSighting>> = store
            .list_unsynced(Utc::now() + chrono::Duration::minutes(6))
            .await
            .unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].attempts, 1);
        assert_eq!(later[0].last_error.as_deref(), Some("remote returned 503"));
    }

    #[tokio::test]
    async fn mark_synced_is_idempotent() {
        let store = setup_store().await;
        let record = store.put(sighting("Galeb")).await.unwrap();

        RecordStore::<WildlifeSighting>::mark_synced(&store, &record.local_id)
            .await
            .unwrap();

        let (first_synced_at,): (Option<i64>,) =
            sqlx::query_as("SELECT synced_at FROM offline_records WHERE local_id = ?1")
                .bind(record.local_id.as_str())
                .fetch_one(&store.pool)
                .await
                .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        RecordStore::<WildlifeSighting>::mark_synced(&store, &record.local_id)
            .await
            .unwrap();

        let (second_synced_at,): (Option<i64>,) =
            sqlx::query_as("SELECT synced_at FROM offline_records WHERE local_id = ?1")
                .bind(record.local_id.as_str())
                .fetch_one(&store.pool)
                .await
                .unwrap();

        assert_eq!(first_synced_at, second_synced_at);
        assert_eq!(
            RecordStore::<WildlifeSighting>::count_pending(&store)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn record_failure_never_resurrects_synced_records() {
        let store = setup_store().await;
        let record = store.put(sighting("Galeb")).await.unwrap();

        RecordStore::<WildlifeSighting>::mark_synced(&store, &record.local_id)
            .await
            .unwrap();
        RecordStore::<WildlifeSighting>::record_failure(
            &store,
            &record.local_id,
            "stale failure",
            None,
            true,
        )
        .await
        .unwrap();

        let all: Vec<SyncableRecord<WildlifeSighting>> = store.list_all().await.unwrap();
        assert!(all[0].synced);
        assert_eq!(all[0].state, SyncState::Synced);
    }

    #[tokio::test]
    async fn needs_review_leaves_pending_count() {
        let store = setup_store().await;
        let record = store.put(sighting("Galeb")).await.unwrap();

        RecordStore::<WildlifeSighting>::record_failure(
            &store,
            &record.local_id,
            "remote returned 422",
            None,
            true,
        )
        .await
        .unwrap();

        assert_eq!(
            RecordStore::<WildlifeSighting>::count_pending(&store)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            RecordStore::<WildlifeSighting>::count_needs_review(&store)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn clear_removes_only_one_kind() {
        let store = setup_store().await;
        store.put(sighting("Galeb")).await.unwrap();
        store.put(task("Obilazak ograde")).await.unwrap();

        RecordStore::<WildlifeSighting>::clear(&store).await.unwrap();

        let sightings: Vec<SyncableRecord<WildlifeSighting>> = store.list_all().await.unwrap();
        let tasks: Vec<SyncableRecord<Task>> = store.list_all().await.unwrap();
        assert!(sightings.is_empty());
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn records_survive_pool_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("aerosync.db").display()
        );

        let local_id = {
            let pool = ConnectionPool::new(&url, 1).await.unwrap();
            pool.initialize().await.unwrap();
            let store = SqliteRecordStore::new(pool.get_pool().clone());
            let stored = store.put(sighting("Galeb")).await.unwrap();
            pool.close().await;
            stored.local_id
        };

        let pool = ConnectionPool::new(&url, 1).await.unwrap();
        pool.initialize().await.unwrap();
        let store = SqliteRecordStore::new(pool.get_pool().clone());
        let all: Vec<SyncableRecord<WildlifeSighting>> = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].local_id, local_id);
    }
}
