use tokio::sync::watch;

/// Source of the environment's online/offline signal. Purely an event
/// source: it never retries, batches, or debounces.
pub trait ConnectivityMonitor: Send + Sync {
    fn is_online(&self) -> bool;

    /// Subscribe to state changes; the receiver yields the current state on
    /// every transition.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
