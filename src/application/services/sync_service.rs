use crate::application::ports::{ConnectivityMonitor, RecordStore, RemoteGateway};
use crate::domain::entities::{
    HazardReport, OfflineSnapshot, SyncPayload, SyncReport, SyncableRecord, Task, WildlifeSighting,
};
use crate::shared::config::SyncPolicy;
use crate::shared::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The sync orchestrator: the only component that talks to the remote
/// gateway, and the owner of the pending -> synced transition.
///
/// Exactly one sync pass may be in flight per instance. A concurrent caller
/// loses the compare-exchange race and gets an immediate no-op report; it is
/// not queued. Writes landing during a pass stay pending for the next one.
pub struct SyncService<S, G, C> {
    store: Arc<S>,
    gateway: Arc<G>,
    connectivity: Arc<C>,
    policy: SyncPolicy,
    in_flight: Arc<AtomicBool>,
}

impl<S, G, C> Clone for SyncService<S, G, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gateway: self.gateway.clone(),
            connectivity: self.connectivity.clone(),
            policy: self.policy.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<S, G, C> SyncService<S, G, C>
where
    S: RecordStore<WildlifeSighting> + RecordStore<HazardReport> + RecordStore<Task> + 'static,
    G: RemoteGateway<WildlifeSighting> + RemoteGateway<HazardReport> + RemoteGateway<Task> + 'static,
    C: ConnectivityMonitor + 'static,
{
    pub fn new(store: Arc<S>, gateway: Arc<G>, connectivity: Arc<C>, policy: SyncPolicy) -> Self {
        Self {
            store,
            gateway,
            connectivity,
            policy,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn add_sighting(
        &self,
        sighting: WildlifeSighting,
    ) -> Result<SyncableRecord<WildlifeSighting>> {
        self.add_record(sighting).await
    }

    pub async fn add_hazard_report(
        &self,
        report: HazardReport,
    ) -> Result<SyncableRecord<HazardReport>> {
        self.add_record(report).await
    }

    pub async fn add_task(&self, task: Task) -> Result<SyncableRecord<Task>> {
        self.add_record(task).await
    }

    async fn add_record<P>(&self, payload: P) -> Result<SyncableRecord<P>>
    where
        P: SyncPayload,
        S: RecordStore<P>,
        G: RemoteGateway<P>,
    {
        payload.validate().map_err(SyncError::Validation)?;

        let record = SyncableRecord::new(payload);
        let stored = <S as RecordStore<P>>::put(self.store.as_ref(), record).await?;

        // Opportunistic push: the write itself already succeeded locally.
        if self.policy.opportunistic && self.connectivity.is_online() {
            let service = self.clone();
            tokio::spawn(async move {
                service.sync_all().await;
            });
        }

        Ok(stored)
    }

    /// One full sync pass: entity kinds drain concurrently, records within a
    /// kind strictly in creation order. Never fails; individual outcomes are
    /// visible only through the report and the remaining pending count.
    pub async fn sync_all(&self) -> SyncReport {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("sync pass already in flight, skipping");
            return SyncReport::skipped();
        }

        let now = Utc::now();
        let (sightings, hazards, tasks) = tokio::join!(
            self.drain::<WildlifeSighting>(now),
            self.drain::<HazardReport>(now),
            self.drain::<Task>(now),
        );

        self.in_flight.store(false, Ordering::SeqCst);

        let synced = sightings.0 + hazards.0 + tasks.0;
        let failed = sightings.1 + hazards.1 + tasks.1;
        let pending = self.pending_sync_count().await.unwrap_or(0);
        tracing::info!(synced, failed, pending, "sync pass complete");

        SyncReport::new(synced, failed, pending)
    }

    /// Drain the pending records of one kind. Returns (synced, failed); a
    /// failed record never aborts the pass for its siblings.
    async fn drain<P>(&self, now: DateTime<Utc>) -> (u32, u32)
    where
        P: SyncPayload,
        S: RecordStore<P>,
        G: RemoteGateway<P>,
    {
        let pending = match <S as RecordStore<P>>::list_unsynced(self.store.as_ref(), now).await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(kind = %P::KIND, error = %err, "failed to list pending records");
                return (0, 0);
            }
        };

        let mut synced = 0u32;
        let mut failed = 0u32;

        for record in pending {
            match self.gateway.push(&record).await {
                Ok(()) => {
                    match <S as RecordStore<P>>::mark_synced(self.store.as_ref(), &record.local_id)
                        .await
                    {
                        Ok(()) => synced += 1,
                        Err(err) => {
                            failed += 1;
                            tracing::error!(
                                kind = %P::KIND,
                                local_id = %record.local_id,
                                error = %err,
                                "pushed record but failed to mark it synced"
                            );
                        }
                    }
                }
                Err(push_err) => {
                    failed += 1;
                    let attempts = record.attempts + 1;
                    let needs_review =
                        push_err.is_permanent() || attempts >= self.policy.max_attempts;
                    let retry_at =
                        (!needs_review).then(|| Utc::now() + self.policy.backoff_after(attempts));

                    tracing::warn!(
                        kind = %P::KIND,
                        local_id = %record.local_id,
                        attempts,
                        needs_review,
                        error = %push_err,
                        "push failed, record stays local"
                    );

                    if let Err(err) = <S as RecordStore<P>>::record_failure(
                        self.store.as_ref(),
                        &record.local_id,
                        &push_err.to_string(),
                        retry_at,
                        needs_review,
                    )
                    .await
                    {
                        tracing::error!(
                            kind = %P::KIND,
                            local_id = %record.local_id,
                            error = %err,
                            "failed to record push failure"
                        );
                    }
                }
            }
        }

        (synced, failed)
    }

    /// Live sum of pending records across all kinds, straight from the store.
    pub async fn pending_sync_count(&self) -> Result<u64> {
        let (sightings, hazards, tasks) = tokio::join!(
            <S as RecordStore<WildlifeSighting>>::count_pending(self.store.as_ref()),
            <S as RecordStore<HazardReport>>::count_pending(self.store.as_ref()),
            <S as RecordStore<Task>>::count_pending(self.store.as_ref()),
        );
        Ok(sightings? + hazards? + tasks?)
    }

    /// Records parked for manual review after permanent failures or an
    /// exhausted attempt budget.
    pub async fn needs_review_count(&self) -> Result<u64> {
        let (sightings, hazards, tasks) = tokio::join!(
            <S as RecordStore<WildlifeSighting>>::count_needs_review(self.store.as_ref()),
            <S as RecordStore<HazardReport>>::count_needs_review(self.store.as_ref()),
            <S as RecordStore<Task>>::count_needs_review(self.store.as_ref()),
        );
        Ok(sightings? + hazards? + tasks?)
    }

    pub async fn all_offline_data(&self) -> Result<OfflineSnapshot> {
        let (sightings, hazard_reports, tasks) = tokio::join!(
            <S as RecordStore<WildlifeSighting>>::list_all(self.store.as_ref()),
            <S as RecordStore<HazardReport>>::list_all(self.store.as_ref()),
            <S as RecordStore<Task>>::list_all(self.store.as_ref()),
        );
        Ok(OfflineSnapshot {
            sightings: sightings?,
            hazard_reports: hazard_reports?,
            tasks: tasks?,
        })
    }

    pub async fn clear_all_offline_data(&self) -> Result<()> {
        let (sightings, hazards, tasks) = tokio::join!(
            <S as RecordStore<WildlifeSighting>>::clear(self.store.as_ref()),
            <S as RecordStore<HazardReport>>::clear(self.store.as_ref()),
            <S as RecordStore<Task>>::clear(self.store.as_ref()),
        );
        sightings?;
        hazards?;
        tasks?;
        Ok(())
    }

    /// Background task that starts a sync pass on each offline -> online
    /// transition with pending work. Each trigger fires `sync_all` once; the
    /// in-flight guard handles rapid repeated transitions.
    pub fn spawn_connectivity_listener(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        let mut rx = self.connectivity.subscribe();

        tokio::spawn(async move {
            let mut was_online = *rx.borrow();
            while rx.changed().await.is_ok() {
                let online = *rx.borrow();
                if online && !was_online {
                    match service.pending_sync_count().await {
                        Ok(0) => {}
                        Ok(pending) => {
                            tracing::info!(pending, "connectivity restored, starting sync pass");
                            service.sync_all().await;
                        }
                        Err(err) => {
                            tracing::error!(error = %err, "failed to read pending count");
                        }
                    }
                }
                was_online = online;
            }
        })
    }
}
