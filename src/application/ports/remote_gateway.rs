use crate::domain::entities::{SyncPayload, SyncableRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Why a push failed, and whether retrying can help.
///
/// Transient failures (network faults, timeouts, 5xx) leave the record
/// pending for a later pass. Permanent failures (4xx) park it for manual
/// review; retrying the same payload cannot succeed.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("transient push failure: {0}")]
    Transient(String),

    #[error("permanent push failure: {0}")]
    Permanent(String),
}

impl PushError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, PushError::Permanent(_))
    }
}

/// The only path to the authoritative backend. One conceptual endpoint per
/// entity kind with create-or-update semantics; server-side idempotency for
/// retried records is the backend's responsibility.
#[async_trait]
pub trait RemoteGateway<P: SyncPayload>: Send + Sync {
    async fn push(&self, record: &SyncableRecord<P>) -> std::result::Result<(), PushError>;
}
