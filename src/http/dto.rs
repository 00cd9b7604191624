//! JSON payloads exchanged with clients.

use crate::content::domain::{
    AuthorId, ContentDomainError, MessageContentRecord, MessageContentUpdate, MessageId,
    MessageText, NewMessageContent,
};
use crate::registration::domain::{ChannelId, GuildId, GuildRegistration, RegistrationDomainError};
use serde::{Deserialize, Serialize};

/// Guild registration as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDto {
    /// Guild snowflake.
    pub guild_id: i64,
    /// Log channel snowflake.
    pub channel_id: i64,
}

impl RegistrationDto {
    /// Validates the payload into a domain registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationDomainError`] for non-positive ids.
    pub fn into_domain(self) -> Result<GuildRegistration, RegistrationDomainError> {
        Ok(GuildRegistration::new(
            GuildId::new(self.guild_id)?,
            ChannelId::new(self.channel_id)?,
        ))
    }
}

impl From<GuildRegistration> for RegistrationDto {
    fn from(registration: GuildRegistration) -> Self {
        Self {
            guild_id: registration.guild_id().value(),
            channel_id: registration.channel_id().value(),
        }
    }
}

/// Archived message content as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContentDto {
    /// Message snowflake.
    pub message_id: i64,
    /// Message body, at most 4000 characters.
    pub message_content: String,
    /// Author snowflake.
    pub author_id: i64,
}

impl MessageContentDto {
    /// Validates the payload as a new archive entry.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] for non-positive ids or oversized text.
    pub fn into_new(self) -> Result<NewMessageContent, ContentDomainError> {
        Ok(NewMessageContent {
            message_id: MessageId::new(self.message_id)?,
            content: MessageText::new(self.message_content)?,
            author_id: AuthorId::new(self.author_id)?,
        })
    }

    /// Validates the payload as a full overwrite of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDomainError`] for non-positive ids or oversized text.
    pub fn into_update(self) -> Result<(MessageId, MessageContentUpdate), ContentDomainError> {
        let message_id = MessageId::new(self.message_id)?;
        let update = MessageContentUpdate::new()
            .with_content(MessageText::new(self.message_content)?)
            .with_author(AuthorId::new(self.author_id)?);
        Ok((message_id, update))
    }
}

impl From<MessageContentRecord> for MessageContentDto {
    fn from(record: MessageContentRecord) -> Self {
        Self {
            message_id: record.message_id().value(),
            author_id: record.author_id().value(),
            message_content: record.content().as_str().to_owned(),
        }
    }
}
