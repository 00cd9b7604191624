//! Error types for guild registration domain validation.

use thiserror::Error;

/// Errors returned while constructing registration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationDomainError {
    /// Guild identifiers are positive snowflakes.
    #[error("guild ID must be positive, got {0}")]
    NonPositiveGuildId(i64),

    /// Channel identifiers are positive snowflakes.
    #[error("channel ID must be positive, got {0}")]
    NonPositiveChannelId(i64),
}

/// Error returned while parsing a registration kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown registration kind: {0}")]
pub struct ParseRegistrationKindError(pub String);
