//! Periodic sheet refresh.
//!
//! One fetch at startup, then one at every interval boundary counted from the
//! unix epoch; with the default 60 minutes that is the top of every hour.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::PlayerStore;

/// First interval boundary strictly after `now`.
pub fn next_aligned_tick(now: DateTime<Utc>, interval_minutes: u32) -> DateTime<Utc> {
    let interval_secs = i64::from(interval_minutes.max(1)) * 60;
    let next = (now.timestamp().div_euclid(interval_secs) + 1) * interval_secs;
    DateTime::from_timestamp(next, 0)
        .unwrap_or_else(|| now + chrono::Duration::seconds(interval_secs))
}

fn until(now: DateTime<Utc>, tick: DateTime<Utc>) -> Duration {
    (tick - now).to_std().unwrap_or(Duration::ZERO)
}

/// Spawn the refresh loop. Returns a handle that can be aborted.
pub fn spawn_refresh_loop(store: Arc<PlayerStore>, interval_minutes: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        store.init().await;

        loop {
            let now = Utc::now();
            let tick = next_aligned_tick(now, interval_minutes);
            debug!(next_refresh = %tick, "Scheduled next sheet refresh");
            tokio::time::sleep(until(now, tick)).await;

            info!(tick = %tick, "Scheduled sheet refresh");
            if let Err(e) = store.refresh().await {
                debug!(error = %e, "Scheduled refresh failed, keeping previous data");
            }
        }
    })
}
