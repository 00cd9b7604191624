//! Identifier types for the guild registration domain.

use super::RegistrationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snowflake identifier of a guild; primary key of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(i64);

impl GuildId {
    /// Creates a guild identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationDomainError::NonPositiveGuildId`] when the value
    /// is zero or negative.
    pub const fn new(value: i64) -> Result<Self, RegistrationDomainError> {
        if value <= 0 {
            return Err(RegistrationDomainError::NonPositiveGuildId(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snowflake identifier of the channel receiving a guild's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(i64);

impl ChannelId {
    /// Creates a channel identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationDomainError::NonPositiveChannelId`] when the
    /// value is zero or negative.
    pub const fn new(value: i64) -> Result<Self, RegistrationDomainError> {
        if value <= 0 {
            return Err(RegistrationDomainError::NonPositiveChannelId(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
