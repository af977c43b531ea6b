//! Periodic removal of expired sessions.
//!
//! Lookups already hide expired entries; the sweep only bounds memory held by
//! sessions nobody comes back for.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::ports::SessionStore;

/// Run one purge, logging the outcome. Returns the number removed.
pub async fn sweep_once(store: &dyn SessionStore) -> usize {
    match store.purge_expired().await {
        Ok(0) => {
            debug!("session sweep found nothing to remove");
            0
        }
        Ok(removed) => {
            info!(removed, "expired sessions purged");
            removed
        }
        Err(err) => {
            warn!(error = %err, "session sweep failed");
            0
        }
    }
}

/// Sweep `store` every `every` until the task is aborted.
pub fn spawn_session_sweeper(store: Arc<dyn SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            sweep_once(store.as_ref()).await;
        }
    })
}
