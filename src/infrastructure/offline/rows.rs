use sqlx::FromRow;

/// Raw row shape of the `offline_records` table. Timestamps are epoch
/// milliseconds; `payload` is the JSON-encoded domain payload.
#[derive(Debug, Clone, FromRow)]
pub struct OfflineRecordRow {
    pub id: i64,
    pub local_id: String,
    pub entity_kind: String,
    pub payload: String,
    pub is_synced: bool,
    pub status: String,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub next_retry_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub synced_at: Option<i64>,
}
