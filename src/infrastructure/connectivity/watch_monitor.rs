use crate::application::ports::ConnectivityMonitor;
use tokio::sync::watch;

/// Connectivity signal backed by a watch channel. The host runtime feeds it
/// through `set_online` (browser network events, OS reachability, a
/// heartbeat probe); the engine only observes.
pub struct WatchConnectivity {
    tx: watch::Sender<bool>,
}

impl WatchConnectivity {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }
}

impl ConnectivityMonitor for WatchConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transitions_reach_subscribers() {
        let monitor = WatchConnectivity::new(false);
        assert!(!monitor.is_online());

        let mut rx = monitor.subscribe();
        monitor.set_online(true);

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(monitor.is_online());
    }
}
