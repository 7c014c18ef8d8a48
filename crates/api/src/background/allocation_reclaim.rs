//! Periodic release of license seats held by long-deleted assets.
//!
//! A soft-deleted asset keeps its license-pool bindings so a restore can
//! re-acquire them. This retention policy bounds how long those
//! suspended bindings survive: once an asset has sat in the trash longer
//! than the configured window, its seats are released and the bindings
//! cleared for good. Disabled unless `ALLOCATION_RETENTION_DAYS` is set.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use stockroom_store::Engine;
use tokio_util::sync::CancellationToken;

/// How often the reclaim sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the allocation reclaim loop until `cancel` is triggered.
pub async fn run(engine: Arc<Engine>, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Allocation reclaim job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Allocation reclaim job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(retention_days);
                let released = engine.reclaim_suspended(cutoff).await;
                if released > 0 {
                    tracing::info!(released, "Allocation reclaim: released suspended seats");
                } else {
                    tracing::debug!("Allocation reclaim: nothing past retention");
                }
            }
        }
    }
}
