//! Bounded message body.

use super::ContentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum body length in characters, matching the `VARCHAR(4000)` column.
pub const MAX_CONTENT_LENGTH: usize = 4000;

/// Archived message body, at most [`MAX_CONTENT_LENGTH`] characters.
///
/// Empty bodies are valid (attachment-only messages).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageText(String);

impl MessageText {
    /// Creates a validated message body.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError::ContentTooLong`] when the body exceeds
    /// [`MAX_CONTENT_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ContentDomainError> {
        let text = value.into();
        let length = text.chars().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(ContentDomainError::ContentTooLong {
                actual: length,
                max: MAX_CONTENT_LENGTH,
            });
        }
        Ok(Self(text))
    }

    /// Returns the body as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MessageText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
