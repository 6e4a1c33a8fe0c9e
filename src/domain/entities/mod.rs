mod hazard;
mod record;
mod sighting;
mod snapshot;
mod task;

pub use hazard::{HazardPriority, HazardReport, HazardStatus};
pub use record::{SyncPayload, SyncableRecord};
pub use sighting::WildlifeSighting;
pub use snapshot::{OfflineSnapshot, SyncReport};
pub use task::{Task, TaskPriority, TaskStatus, TaskType};
