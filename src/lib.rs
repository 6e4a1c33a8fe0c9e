//! Offline-first synchronization engine for the airfield operations
//! dashboard.
//!
//! Writes always land in the local SQLite store first, tagged pending; the
//! [`SyncService`] later drains them through the remote gateway in FIFO
//! order per entity kind, triggered manually, opportunistically after an
//! online write, or by a connectivity transition.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{ConnectivityMonitor, PushError, RecordStore, RemoteGateway};
pub use application::services::SyncService;
pub use domain::entities::{
    HazardPriority, HazardReport, HazardStatus, OfflineSnapshot, SyncPayload, SyncReport,
    SyncableRecord, Task, TaskPriority, TaskStatus, TaskType, WildlifeSighting,
};
pub use domain::value_objects::{EntityKind, LocalId, Severity, SyncState};
pub use infrastructure::connectivity::WatchConnectivity;
pub use infrastructure::database::ConnectionPool;
pub use infrastructure::offline::SqliteRecordStore;
pub use infrastructure::remote::HttpRemoteGateway;
pub use shared::config::{DatabaseConfig, EngineConfig, RemoteConfig, SyncPolicy};
pub use shared::error::{Result, SyncError};

/// Install the tracing subscriber for embedding applications that do not
/// bring their own.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerosync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
