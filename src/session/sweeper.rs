//! Periodic logout sweep.
//!
//! Every tick empties the whole session store. There is no per-session
//! expiry; everyone is logged out together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::observability::metrics;
use crate::session::store::SessionStore;

pub struct Sweeper {
    store: Arc<SessionStore>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(store: Arc<SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Sweep until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Session sweeper starting");

        // First sweep one full interval after start.
        let Some(start) = Instant::now().checked_add(self.interval) else {
            tracing::warn!(
                interval_secs = self.interval.as_secs(),
                "Sweep interval exceeds the runtime clock, sessions will not be swept"
            );
            let _ = shutdown.recv().await;
            return;
        };
        let mut ticker = time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let cleared = self.store.clear();
                    metrics::record_sweep();
                    tracing::info!(cleared, "Logged out all sessions");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Session sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::permissions::TableAccess;
    use crate::access::users::{UserDirectory, UserRecord};
    use crate::lifecycle::Shutdown;

    fn store() -> Arc<SessionStore> {
        let users = UserDirectory::new([UserRecord {
            username: "alice".to_string(),
            password: Some("pw".to_string()),
            tables: TableAccess::All,
            permissions: ["admin".to_string()].into_iter().collect(),
        }]);
        Arc::new(SessionStore::new(true, Arc::new(users)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_logs_everyone_out() {
        let store = store();
        store.login("10.0.0.1", "alice", "pw").unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(
            Sweeper::new(store.clone(), Duration::from_secs(60)).run(shutdown.subscribe()),
        );

        time::sleep(Duration::from_secs(30)).await;
        assert!(store.is_authenticated("10.0.0.1"));

        time::sleep(Duration::from_secs(31)).await;
        assert!(!store.is_authenticated("10.0.0.1"));

        // Sessions created after a tick survive until the next one.
        store.login("10.0.0.1", "alice", "pw").unwrap();
        time::sleep(Duration::from_secs(30)).await;
        assert!(store.is_authenticated("10.0.0.1"));
        time::sleep(Duration::from_secs(30)).await;
        assert!(!store.is_authenticated("10.0.0.1"));

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_shutdown() {
        let shutdown = Shutdown::new();
        let handle = tokio::spawn(
            Sweeper::new(store(), Duration::from_secs(3600)).run(shutdown.subscribe()),
        );

        tokio::task::yield_now().await;
        shutdown.trigger();
        handle.await.unwrap();
        assert_eq!(shutdown.receiver_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unschedulable_interval_never_sweeps() {
        let store = store();
        store.login("10.0.0.1", "alice", "pw").unwrap();

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(Sweeper::new(store.clone(), Duration::MAX).run(shutdown.subscribe()));

        time::sleep(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert!(!handle.is_finished());
        assert!(store.is_authenticated("10.0.0.1"));

        shutdown.trigger();
        handle.await.unwrap();
    }
}
