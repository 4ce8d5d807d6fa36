//! Periodic deletion of expired refresh sessions.
//!
//! Expiry is already enforced at lookup time, so this sweep only reclaims
//! storage. Overlapping runs are harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::service::AuthService;

/// Run the cleanup loop every `interval` until `cancel` is triggered.
///
/// The first sweep runs immediately.
pub async fn run(auth: Arc<AuthService>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Session cleanup job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match auth.purge_expired().await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Session cleanup: purged expired sessions");
                    }
                    Ok(_) => {
                        tracing::debug!("Session cleanup: nothing to purge");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session cleanup failed");
                    }
                }
            }
        }
    }
}
