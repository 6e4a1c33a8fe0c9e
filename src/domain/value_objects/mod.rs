mod entity_kind;
mod local_id;
mod severity;
mod sync_state;

pub use entity_kind::EntityKind;
pub use local_id::LocalId;
pub use severity::Severity;
pub use sync_state::SyncState;
