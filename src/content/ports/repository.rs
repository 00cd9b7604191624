//! Repository port for archived message content.

use crate::content::domain::{MessageContentChanges, MessageContentRecord, MessageId};
use crate::error::{Classify, ErrorKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for message content repository operations.
pub type ContentRepositoryResult<T> = Result<T, ContentRepositoryError>;

/// Message content persistence contract.
#[async_trait]
pub trait MessageContentRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::DuplicateMessage`] when a record
    /// with the same message id exists.
    async fn insert(&self, record: &MessageContentRecord) -> ContentRepositoryResult<()>;

    /// Returns whether a record exists for the message.
    async fn exists(&self, message_id: MessageId) -> ContentRepositoryResult<bool>;

    /// Finds a record by message id.
    async fn find_by_id(
        &self,
        message_id: MessageId,
    ) -> ContentRepositoryResult<Option<MessageContentRecord>>;

    /// Writes the changed fields of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`ContentRepositoryError::NotFound`] when no row was updated.
    async fn update_fields(
        &self,
        message_id: MessageId,
        changes: &MessageContentChanges,
    ) -> ContentRepositoryResult<()>;

    /// Removes a record. Returns `true` when a row was removed.
    async fn delete_by_id(&self, message_id: MessageId) -> ContentRepositoryResult<bool>;

    /// Removes every record created strictly before `cutoff` and returns
    /// how many were removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ContentRepositoryResult<u64>;
}

/// Errors returned by message content repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ContentRepositoryError {
    /// A record for the message already exists.
    #[error("content for message {0} is already archived")]
    DuplicateMessage(MessageId),

    /// No record exists for the message.
    #[error("no archived content for message {0}")]
    NotFound(MessageId),

    /// A store constraint other than uniqueness rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ContentRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    #[must_use]
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for ContentRepositoryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateMessage(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}
