//! In-memory repository for message content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::content::{
    domain::{
        MessageContentChanges, MessageContentRecord, MessageContentUpdate, MessageId,
    },
    ports::{ContentRepositoryError, ContentRepositoryResult, MessageContentRepository},
};

type RecordMap = HashMap<MessageId, MessageContentRecord>;

/// Thread-safe in-memory message content repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageContentRepository {
    records: Arc<RwLock<RecordMap>>,
}

fn poisoned<T>(err: PoisonError<T>) -> ContentRepositoryError {
    ContentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryMessageContentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn len(&self) -> ContentRepositoryResult<usize> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }
}

#[async_trait]
impl MessageContentRepository for InMemoryMessageContentRepository {
    async fn insert(&self, record: &MessageContentRecord) -> ContentRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let message_id = record.message_id();
        if records.contains_key(&message_id) {
            return Err(ContentRepositoryError::DuplicateMessage(message_id));
        }
        records.insert(message_id, record.clone());
        Ok(())
    }

    async fn exists(&self, message_id: MessageId) -> ContentRepositoryResult<bool> {
        Ok(self
            .records
            .read()
            .map_err(poisoned)?
            .contains_key(&message_id))
    }

    async fn find_by_id(
        &self,
        message_id: MessageId,
    ) -> ContentRepositoryResult<Option<MessageContentRecord>> {
        Ok(self.records.read().map_err(poisoned)?.get(&message_id).cloned())
    }

    async fn update_fields(
        &self,
        message_id: MessageId,
        changes: &MessageContentChanges,
    ) -> ContentRepositoryResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let record = records
            .get_mut(&message_id)
            .ok_or(ContentRepositoryError::NotFound(message_id))?;

        let mut update = MessageContentUpdate::new();
        if let Some(content) = &changes.content {
            update = update.with_content(content.clone());
        }
        if let Some(author_id) = changes.author_id {
            update = update.with_author(author_id);
        }
        record.apply(update);
        Ok(())
    }

    async fn delete_by_id(&self, message_id: MessageId) -> ContentRepositoryResult<bool> {
        Ok(self
            .records
            .write()
            .map_err(poisoned)?
            .remove(&message_id)
            .is_some())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ContentRepositoryResult<u64> {
        let mut records = self.records.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|_, record| record.created_at() >= cutoff);
        Ok(u64::try_from(before - records.len()).unwrap_or(u64::MAX))
    }
}
