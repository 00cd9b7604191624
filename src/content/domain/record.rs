//! Archived message content aggregate.

use super::{AuthorId, MessageId, MessageText};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Archived copy of a message.
///
/// `created_at` is stamped once when the record is first saved and is never
/// changed afterwards; it drives retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContentRecord {
    message_id: MessageId,
    content: MessageText,
    author_id: AuthorId,
    created_at: DateTime<Utc>,
}

/// Client payload for archiving a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessageContent {
    /// Message identifier.
    pub message_id: MessageId,
    /// Message body.
    pub content: MessageText,
    /// Message author.
    pub author_id: AuthorId,
}

/// Parameter object for reconstructing a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageContent {
    /// Persisted message identifier.
    pub message_id: MessageId,
    /// Persisted message body.
    pub content: MessageText,
    /// Persisted author.
    pub author_id: AuthorId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Field-level overwrite requested by a client.
///
/// Every supplied field replaces the stored value; omitted fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContentUpdate {
    content: Option<MessageText>,
    author_id: Option<AuthorId>,
}

impl MessageContentUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the message body.
    #[must_use]
    pub fn with_content(mut self, content: MessageText) -> Self {
        self.content = Some(content);
        self
    }

    /// Replaces the author.
    #[must_use]
    pub const fn with_author(mut self, author_id: AuthorId) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

/// Fields that actually differ from the stored record after an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContentChanges {
    /// New body, when it changed.
    pub content: Option<MessageText>,
    /// New author, when it changed.
    pub author_id: Option<AuthorId>,
}

impl MessageContentChanges {
    /// Returns whether nothing changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.author_id.is_none()
    }
}

impl MessageContentRecord {
    /// Creates a record for a newly archived message, stamped with the
    /// current clock time truncated to the microseconds Postgres stores.
    #[must_use]
    pub fn new(new_content: NewMessageContent, clock: &impl Clock) -> Self {
        Self {
            message_id: new_content.message_id,
            content: new_content.content,
            author_id: new_content.author_id,
            created_at: clock.utc().trunc_subsecs(6),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageContent) -> Self {
        Self {
            message_id: data.message_id,
            content: data.content,
            author_id: data.author_id,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Returns the message body.
    #[must_use]
    pub const fn content(&self) -> &MessageText {
        &self.content
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> AuthorId {
        self.author_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a client update and returns the fields that changed.
    ///
    /// The identifier and creation timestamp are never touched.
    pub fn apply(&mut self, update: MessageContentUpdate) -> MessageContentChanges {
        let mut changes = MessageContentChanges::default();

        if let Some(content) = update.content
            && content != self.content
        {
            self.content = content.clone();
            changes.content = Some(content);
        }

        if let Some(author_id) = update.author_id
            && author_id != self.author_id
        {
            self.author_id = author_id;
            changes.author_id = Some(author_id);
        }

        changes
    }
}
