//! Periodic removal of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::Sweep;

/// Sweep every store once, returning the total number of removed entries.
pub fn sweep_all(stores: &[Arc<dyn Sweep>]) -> usize {
    stores
        .iter()
        .map(|store| {
            let removed = store.sweep();
            if removed > 0 {
                debug!(cache = store.name(), removed, "Swept expired cache entries");
            }
            removed
        })
        .sum()
}

/// Spawn a task that sweeps all stores every `interval`.
///
/// Runs until the returned handle is aborted or the runtime shuts down.
pub fn spawn_sweeper(stores: Vec<Arc<dyn Sweep>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep_all(&stores);
        }
    })
}
