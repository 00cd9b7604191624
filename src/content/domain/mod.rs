//! Domain model for archived message content.
//!
//! Messages are archived when sent so that later edits and deletions can be
//! logged with the original text. Records are keyed by the message's
//! snowflake and carry an immutable creation timestamp used for retention.

mod error;
mod ids;
mod record;
mod text;

pub use error::ContentDomainError;
pub use ids::{AuthorId, MessageId};
pub use record::{
    MessageContentChanges, MessageContentRecord, MessageContentUpdate, NewMessageContent,
    PersistedMessageContent,
};
pub use text::{MAX_CONTENT_LENGTH, MessageText};
