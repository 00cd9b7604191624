//! Identifier types for the message content domain.

use super::ContentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snowflake identifier of an archived message; primary key and lock key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Creates a message identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::NonPositiveMessageId`] when the value is
    /// zero or negative.
    pub const fn new(value: i64) -> Result<Self, ContentDomainError> {
        if value <= 0 {
            return Err(ContentDomainError::NonPositiveMessageId(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snowflake identifier of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(i64);

impl AuthorId {
    /// Creates an author identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::NonPositiveAuthorId`] when the value is
    /// zero or negative.
    pub const fn new(value: i64) -> Result<Self, ContentDomainError> {
        if value <= 0 {
            return Err(ContentDomainError::NonPositiveAuthorId(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
