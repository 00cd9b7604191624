//! Message content service without locking.

use crate::cache::{self, RecordCache};
use crate::content::{
    domain::{MessageContentRecord, MessageContentUpdate, MessageId, NewMessageContent},
    ports::{
        ContentRepositoryError, ContentServiceResult, MessageContentOperations,
        MessageContentRepository,
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Message content orchestration service.
///
/// Used directly when per-message locking is disabled, and wrapped by
/// [`super::LockingMessageContentService`] otherwise.
pub struct MessageContentService<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    cache: Arc<dyn RecordCache<MessageContentRecord>>,
    clock: Arc<C>,
}

impl<R, C> Clone for MessageContentService<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> MessageContentService<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new content service.
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

    /// Archives a new message, stamping its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::DuplicateMessage`] when the message
    /// is already archived.
    pub async fn save(&self, content: NewMessageContent) -> ContentServiceResult<MessageContentRecord> {
        let message_id = content.message_id;
        if self.repository.exists(message_id).await? {
            return Err(ContentRepositoryError::DuplicateMessage(message_id).into());
        }

        let record = MessageContentRecord::new(content, &*self.clock);
        self.repository.insert(&record).await?;
        debug!(%message_id, author_id = %record.author_id(), "archived message content");
        Ok(record)
    }

    /// Returns an archived message, reading through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::NotFound`] when nothing is archived
    /// for the message.
    pub async fn view(&self, message_id: MessageId) -> ContentServiceResult<MessageContentRecord> {
        cache::get_or_load(self.cache.as_ref(), message_id.into(), || {
            self.find_by_id_or_error(message_id)
        })
        .await
    }

    /// Overwrites the supplied fields of an archived message.
    ///
    /// Unchanged fields are not written. The creation timestamp is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::NotFound`] when nothing is archived
    /// for the message.
    pub async fn update(
        &self,
        message_id: MessageId,
        update: MessageContentUpdate,
    ) -> ContentServiceResult<MessageContentRecord> {
        let mut record = self.find_by_id_or_error(message_id).await?;

        let changes = record.apply(update);
        if !changes.is_empty() {
            self.repository.update_fields(message_id, &changes).await?;
        }
        cache::invalidate(self.cache.as_ref(), message_id)?;

        debug!(
            %message_id,
            content_changed = changes.content.is_some(),
            author_changed = changes.author_id.is_some(),
            "updated message content"
        );
        Ok(record)
    }

    /// Removes an archived message.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::NotFound`] when nothing is archived
    /// for the message.
    pub async fn delete(&self, message_id: MessageId) -> ContentServiceResult<()> {
        if !self.repository.exists(message_id).await? {
            return Err(ContentRepositoryError::NotFound(message_id).into());
        }

        if self.repository.delete_by_id(message_id).await? {
            debug!(%message_id, "deleted message content");
        } else {
            warn!(%message_id, "message content vanished before delete");
        }
        cache::invalidate(self.cache.as_ref(), message_id)?;
        Ok(())
    }

    async fn find_by_id_or_error(
        &self,
        message_id: MessageId,
    ) -> ContentServiceResult<MessageContentRecord> {
        self.repository
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ContentRepositoryError::NotFound(message_id).into())
    }
}

#[async_trait]
impl<R, C> MessageContentOperations for MessageContentService<R, C>
where
    R: MessageContentRepository,
    C: Clock + Send + Sync,
{
    async fn save(&self, content: NewMessageContent) -> ContentServiceResult<MessageContentRecord> {
        Self::save(self, content).await
    }

    async fn view(&self, message_id: MessageId) -> ContentServiceResult<MessageContentRecord> {
        Self::view(self, message_id).await
    }

    async fn update(
        &self,
        message_id: MessageId,
        update: MessageContentUpdate,
    ) -> ContentServiceResult<MessageContentRecord> {
        Self::update(self, message_id, update).await
    }

    async fn delete(&self, message_id: MessageId) -> ContentServiceResult<()> {
        Self::delete(self, message_id).await
    }
}
