use crate::domain::entities::{SyncPayload, SyncableRecord};
use crate::domain::value_objects::{LocalId, SyncState};
use crate::infrastructure::offline::rows::OfflineRecordRow;
use crate::shared::error::{Result, SyncError};
use chrono::{DateTime, TimeZone, Utc};

pub fn millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub fn datetime_from_millis(value: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value)
        .single()
        .ok_or_else(|| SyncError::Storage(format!("Invalid stored timestamp: {value}")))
}

pub fn record_from_row<P: SyncPayload>(row: OfflineRecordRow) -> Result<SyncableRecord<P>> {
    if row.entity_kind != P::KIND.as_str() {
        return Err(SyncError::Storage(format!(
            "Row {} has kind {} but {} was requested",
            row.id,
            row.entity_kind,
            P::KIND
        )));
    }

    let payload: P = serde_json::from_str(&row.payload)?;
    let local_id = LocalId::new(row.local_id).map_err(SyncError::Storage)?;
    let state = SyncState::parse(&row.status).map_err(SyncError::Storage)?;

    Ok(SyncableRecord {
        local_id,
        created_at: datetime_from_millis(row.created_at)?,
        updated_at: datetime_from_millis(row.updated_at)?,
        synced: row.is_synced,
        state,
        attempts: row.attempts.max(0) as u32,
        last_error: row.last_error,
        payload,
    })
}
