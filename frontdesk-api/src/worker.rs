use frontdesk_store::ReservationStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Periodically evict lapsed holds instead of waiting for the next request
/// to do it. Purely an optimisation; the store purges on every access anyway.
pub fn spawn_expiry_sweeper(store: Arc<ReservationStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Expiry sweeper started, running every {:?}", every);
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            store.purge_expired();
        }
    })
}
