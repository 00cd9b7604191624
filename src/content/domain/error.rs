//! Error types for message content domain validation.

use thiserror::Error;

/// Errors returned while constructing message content domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentDomainError {
    /// Message identifiers are positive snowflakes.
    #[error("message ID must be positive, got {0}")]
    NonPositiveMessageId(i64),

    /// Author identifiers are positive snowflakes.
    #[error("author ID must be positive, got {0}")]
    NonPositiveAuthorId(i64),

    /// The message body exceeds the storage limit.
    #[error("message content has {actual} characters, exceeds limit of {max}")]
    ContentTooLong {
        /// The actual length in characters.
        actual: usize,
        /// The maximum allowed length.
        max: usize,
    },
}
