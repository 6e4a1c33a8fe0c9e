use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-record synchronization lifecycle.
///
/// `Pending` is initial; `Synced` is reached only on a confirmed remote
/// acknowledgment; `NeedsReview` parks a record after a permanent push
/// failure or once the attempt budget is exhausted. The engine never moves
/// a record out of a terminal state on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Pending,
    Synced,
    NeedsReview,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Pending => "pending",
            SyncState::Synced => "synced",
            SyncState::NeedsReview => "needs_review",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pending" => Ok(SyncState::Pending),
            "synced" => Ok(SyncState::Synced),
            "needs_review" => Ok(SyncState::NeedsReview),
            other => Err(format!("Unknown sync state: {other}")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncState::Synced | SyncState::NeedsReview)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
