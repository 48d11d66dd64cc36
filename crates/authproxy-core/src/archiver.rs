//! Periodic sweep of expired sessions into a separate archive store.
//!
//! Grounded on the lease-expiry scan in the teacher's `LeaseManager::find_expired`,
//! adapted to the original companion's garbage collector: every tick, scan
//! the live `sessions` bucket, move everything whose `valid_to` is not in
//! the future into the archive store, and remove it from the live one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use authproxy_storage::{Store, SESSIONS};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::RepositoryError;
use crate::models::Session;

pub struct Archiver {
    live: Store,
    archive: Store,
    sweeping: AtomicBool,
}

impl Archiver {
    #[must_use]
    pub fn new(live: Store, archive: Store) -> Arc<Self> {
        Arc::new(Self {
            live,
            archive,
            sweeping: AtomicBool::new(false),
        })
    }

    /// Run one sweep. Skips (returns `Ok(0)`) if a previous sweep is still
    /// in flight, so overlapping ticks never stack.
    pub async fn sweep_once(&self) -> Result<usize, RepositoryError> {
        if self.sweeping.swap(true, Ordering::AcqRel) {
            return Ok(0);
        }
        let result = self.sweep_inner().await;
        self.sweeping.store(false, Ordering::Release);
        result
    }

    /// Run [`Self::sweep_once`] on `interval`, stopping when `shutdown` fires.
    /// Ticks that overlap a still-running sweep are skipped, not queued.
    pub async fn run(self: Arc<Self>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        info!(interval_secs = interval.as_secs(), "archiver started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        warn!(error = %err, "archive sweep failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("archiver shutting down");
                    return;
                }
            }
        }
    }

    async fn sweep_inner(&self) -> Result<usize, RepositoryError> {
        let now = Utc::now();
        let rows = self.live.list(SESSIONS).await?;
        let mut archived = 0usize;

        for (token, raw) in rows {
            let session: Session = match serde_json::from_str(&raw) {
                Ok(session) => session,
                Err(err) => {
                    warn!(token = %token, error = %err, "failed to decode session during sweep");
                    continue;
                }
            };
            if session.is_live(now) {
                continue;
            }

            if let Err(err) = self.archive.put(SESSIONS, &token, &raw).await {
                warn!(token = %token, error = %err, "failed to archive expired session");
                continue;
            }
            if let Err(err) = self.live.delete(SESSIONS, &token).await {
                warn!(token = %token, error = %err, "failed to remove archived session from live store");
                continue;
            }
            archived += 1;
        }

        info!(archived, "archive sweep complete");
        Ok(archived)
    }
}
