//! Periodic purge of expired refresh-token sessions.
//!
//! Expired rows are already ignored by refresh; this job only keeps the
//! `user_sessions` table from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use passage_core::clock::Clock;
use passage_db::store::SessionStore;
use tokio_util::sync::CancellationToken;

/// Run the cleanup loop until `cancel` is triggered.
///
/// The first purge happens immediately, then once per `interval`.
pub async fn run(
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    cancel: CancellationToken,
) {
    if interval.is_zero() {
        tracing::error!("Session cleanup interval is zero, job not started");
        return;
    }

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Session cleanup job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sessions.delete_expired(clock.now()).await {
                    Ok(0) => tracing::debug!("Session cleanup: no expired sessions"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged expired sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
