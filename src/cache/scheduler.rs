//! Background refresh of the release cache

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::cache::{RefreshOutcome, ReleaseCache};

/// Refresh `cache` now and then every `period`, forever
///
/// Each refresh is awaited before the next tick, so scheduled refreshes never
/// overlap; ticks missed during a slow refresh are dropped. Failures are
/// logged by the cache and retried on the next tick.
pub fn spawn_refresh_task(cache: Arc<ReleaseCache>, period: Duration) -> JoinHandle<()> {
    info!(
        "Refreshing {} every {}s",
        cache.repo(),
        period.as_secs_f64()
    );

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // first tick completes immediately
            ticker.tick().await;
            match cache.refresh().await {
                RefreshOutcome::Failed(_) => debug!("Refresh failed, retrying on next tick"),
                outcome => debug!("Scheduled refresh finished: {:?}", outcome),
            }
        }
    })
}
