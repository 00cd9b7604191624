//! Scoped lock hold that is always given back.

use super::{LockHandle, LockKey, LockManager, LockOwner, LockResult};
use std::sync::Arc;
use tracing::error;

/// A granted hold tied to the manager that issued it.
///
/// Call [`HeldLock::release`] to give the hold back and observe the outcome.
/// A guard dropped without an explicit release (panic or cancellation of the
/// surrounding future) schedules the release on the current Tokio runtime.
pub struct HeldLock<L: LockManager + ?Sized + 'static> {
    manager: Arc<L>,
    handle: Option<LockHandle>,
}

impl<L: LockManager + ?Sized + 'static> HeldLock<L> {
    /// Acquires `key` for `owner` through `manager`.
    ///
    /// # Errors
    ///
    /// Propagates the manager's acquisition error.
    pub async fn acquire(manager: Arc<L>, key: LockKey, owner: LockOwner) -> LockResult<Self> {
        let handle = manager.acquire(&key, owner).await?;
        Ok(Self {
            manager,
            handle: Some(handle),
        })
    }

    /// Returns the current hold count for this guard's owner.
    #[must_use]
    pub fn hold_count(&self) -> u32 {
        self.handle
            .as_ref()
            .map_or(0, |handle| self.manager.hold_count(handle))
    }

    /// Releases the hold.
    ///
    /// # Errors
    ///
    /// Propagates the manager's release error.
    pub async fn release(mut self) -> LockResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.manager.release(handle).await
    }
}

impl<L: LockManager + ?Sized + 'static> Drop for HeldLock<L> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!(key = %handle.key(), "lock guard dropped outside a runtime; hold leaked");
            return;
        };
        let manager = Arc::clone(&self.manager);
        runtime.spawn(async move {
            let key = handle.key().clone();
            if let Err(err) = manager.release(handle).await {
                error!(%key, error = %err, "deferred lock release failed");
            }
        });
    }
}
