//! Operation contract exposed to the boundary layer.

use super::repository::ContentRepositoryError;
use crate::cache::CacheError;
use crate::content::domain::{
    ContentDomainError, MessageContentRecord, MessageContentUpdate, MessageId, NewMessageContent,
};
use crate::error::{Classify, ErrorKind};
use crate::lock::LockError;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by message content operations.
#[derive(Debug, Error)]
pub enum ContentServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ContentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ContentRepositoryError),
    /// Cache operation failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The per-message lock could not be obtained.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl Classify for ContentServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
            Self::Cache(err) => err.kind(),
            Self::Lock(err) => err.kind(),
        }
    }
}

/// Result type for message content operations.
pub type ContentServiceResult<T> = Result<T, ContentServiceError>;

/// Save, view, update, and delete archived message content.
///
/// Implemented both by the plain service and by the locking coordinator that
/// wraps it, so the boundary layer does not know whether locking is enabled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageContentOperations: Send + Sync {
    /// Archives a new message.
    async fn save(&self, content: NewMessageContent) -> ContentServiceResult<MessageContentRecord>;

    /// Returns an archived message.
    async fn view(&self, message_id: MessageId) -> ContentServiceResult<MessageContentRecord>;

    /// Overwrites fields of an archived message.
    async fn update(
        &self,
        message_id: MessageId,
        update: MessageContentUpdate,
    ) -> ContentServiceResult<MessageContentRecord>;

    /// Removes an archived message.
    async fn delete(&self, message_id: MessageId) -> ContentServiceResult<()>;
}
