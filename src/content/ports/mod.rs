//! Port contracts for message content persistence and operations.

pub mod operations;
pub mod repository;

pub use operations::{ContentServiceError, ContentServiceResult, MessageContentOperations};
pub use repository::{ContentRepositoryError, ContentRepositoryResult, MessageContentRepository};

#[cfg(test)]
pub use operations::MockMessageContentOperations;
