//! Per-message lock coordination for content operations.

use crate::content::{
    domain::{MessageContentRecord, MessageContentUpdate, MessageId, NewMessageContent},
    ports::{ContentServiceResult, MessageContentOperations},
};
use crate::lock::{HeldLock, LockKey, LockManager, LockOwner};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Runs every content operation while holding the message's lock.
///
/// The lock key is the decimal message id. Each call uses a fresh owner, so
/// concurrent calls for the same message exclude each other while calls for
/// different messages proceed independently. The hold is given back on every
/// exit path; a release failure after the operation finished is logged and
/// the operation's own result is returned.
pub struct LockingMessageContentService<S, L>
where
    S: MessageContentOperations,
    L: LockManager + ?Sized + 'static,
{
    inner: Arc<S>,
    locks: Arc<L>,
}

impl<S, L> Clone for LockingMessageContentService<S, L>
where
    S: MessageContentOperations,
    L: LockManager + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S, L> LockingMessageContentService<S, L>
where
    S: MessageContentOperations,
    L: LockManager + ?Sized + 'static,
{
    /// Wraps `inner` so each operation runs under `locks`.
    #[must_use]
    pub const fn new(inner: Arc<S>, locks: Arc<L>) -> Self {
        Self { inner, locks }
    }

    async fn with_lock<T, F, Fut>(
        &self,
        operation: &'static str,
        message_id: MessageId,
        run: F,
    ) -> ContentServiceResult<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = ContentServiceResult<T>> + Send,
        T: Send,
    {
        let guard = HeldLock::acquire(
            Arc::clone(&self.locks),
            LockKey::from(message_id),
            LockOwner::new(),
        )
        .await
        .inspect_err(|err| warn!(operation, %message_id, error = %err, "message lock unavailable"))?;
        debug!(operation, %message_id, holds = guard.hold_count(), "message lock acquired");

        let outcome = run().await;

        debug!(operation, %message_id, holds = guard.hold_count(), "releasing message lock");
        if let Err(err) = guard.release().await {
            error!(operation, %message_id, error = %err, "failed to release message lock");
        }
        outcome
    }
}

#[async_trait]
impl<S, L> MessageContentOperations for LockingMessageContentService<S, L>
where
    S: MessageContentOperations,
    L: LockManager + ?Sized + 'static,
{
    async fn save(&self, content: NewMessageContent) -> ContentServiceResult<MessageContentRecord> {
        let message_id = content.message_id;
        self.with_lock("save", message_id, || self.inner.save(content))
            .await
    }

    async fn view(&self, message_id: MessageId) -> ContentServiceResult<MessageContentRecord> {
        self.with_lock("view", message_id, || self.inner.view(message_id))
            .await
    }

    async fn update(
        &self,
        message_id: MessageId,
        update: MessageContentUpdate,
    ) -> ContentServiceResult<MessageContentRecord> {
        self.with_lock("update", message_id, || self.inner.update(message_id, update))
            .await
    }

    async fn delete(&self, message_id: MessageId) -> ContentServiceResult<()> {
        self.with_lock("delete", message_id, || self.inner.delete(message_id))
            .await
    }
}
