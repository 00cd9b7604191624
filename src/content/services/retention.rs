//! Periodic removal of expired message content.

use crate::cache::RecordCache;
use crate::content::domain::MessageContentRecord;
use crate::content::ports::{ContentServiceResult, MessageContentRepository};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// How long archived content is kept.
pub const RETENTION_PERIOD: TimeDelta = TimeDelta::days(30);

/// Time between sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Deletes message content older than [`RETENTION_PERIOD`].
///
/// Sweeps do not take per-message locks; a record being updated while it
/// expires is simply gone afterwards. The content cache region is cleared
/// after any sweep that removed rows.
pub struct RetentionSweeper<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cache: Arc<dyn RecordCache<MessageContentRecord>>,
    clock: Arc<C>,
}

impl<R, C> RetentionSweeper<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sweeper over `repository` that clears `cache` after
    /// removing rows.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn RecordCache<MessageContentRecord>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            cache,
            clock,
        }
    }

    /// Returns the cutoff a sweep started now would use.
    #[must_use]
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.clock.utc() - RETENTION_PERIOD
    }

    /// Runs one sweep relative to the current time.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the range delete fails, or the
    /// cache error when the region cannot be cleared.
    pub async fn sweep(&self) -> ContentServiceResult<u64> {
        self.sweep_before(self.cutoff()).await
    }

    /// Deletes every record created strictly before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the range delete fails, or the
    /// cache error when the region cannot be cleared.
    pub async fn sweep_before(&self, cutoff: DateTime<Utc>) -> ContentServiceResult<u64> {
        let removed = self.repository.delete_older_than(cutoff).await?;
        if removed > 0 {
            self.cache.invalidate_all()?;
        }
        info!(removed, %cutoff, "retention sweep finished");
        Ok(removed)
    }

    /// Sweeps every [`SWEEP_INTERVAL`] until `shutdown` resolves.
    ///
    /// The first sweep runs immediately. Failed sweeps are logged and the
    /// loop carries on.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        self.run_every(SWEEP_INTERVAL, shutdown).await;
    }

    /// Sweeps every `period` until `shutdown` resolves.
    pub async fn run_every<F>(self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("retention sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep().await {
                        error!(error = %err, "retention sweep failed");
                    }
                }
            }
        }
    }
}
