pub mod connectivity;
pub mod record_store;
pub mod remote_gateway;

pub use connectivity::ConnectivityMonitor;
pub use record_store::RecordStore;
pub use remote_gateway::{PushError, RemoteGateway};
