//! Repository port for guild registration persistence.

use crate::error::{Classify, ErrorKind};
use crate::registration::domain::{ChannelId, GuildId, GuildRegistration, RegistrationKind};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registration repository operations.
pub type RegistrationRepositoryResult<T> = Result<T, RegistrationRepositoryError>;

/// Guild registration persistence contract.
///
/// One repository instance serves exactly one [`RegistrationKind`].
/// Implementations must enforce channel uniqueness within that kind.
#[async_trait]
pub trait GuildRegistrationRepository: Send + Sync {
    /// Returns the namespace this repository stores.
    fn kind(&self) -> RegistrationKind;

    /// Stores a new registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::DuplicateGuild`] when the guild
    /// is already registered or [`RegistrationRepositoryError::DuplicateChannel`]
    /// when another guild already uses the channel.
    async fn insert(&self, registration: &GuildRegistration) -> RegistrationRepositoryResult<()>;

    /// Returns whether a registration exists for the guild.
    async fn exists(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool>;

    /// Finds a registration by guild.
    ///
    /// Returns `None` when the guild is not registered.
    async fn find_by_id(
        &self,
        guild_id: GuildId,
    ) -> RegistrationRepositoryResult<Option<GuildRegistration>>;

    /// Writes a new channel for an existing registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::NotFound`] when no row was
    /// updated or [`RegistrationRepositoryError::DuplicateChannel`] when the
    /// channel belongs to another guild.
    async fn update_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationRepositoryResult<()>;

    /// Removes a registration.
    ///
    /// Returns `true` when a row was removed.
    async fn delete_by_id(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool>;
}

/// Errors returned by registration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RegistrationRepositoryError {
    /// The guild is already registered.
    #[error("guild {0} is already registered")]
    DuplicateGuild(GuildId),

    /// The channel is already registered by another guild.
    #[error("channel {0} is already registered by another guild")]
    DuplicateChannel(ChannelId),

    /// The guild is not registered.
    #[error("guild {0} is not registered")]
    NotFound(GuildId),

    /// A store constraint other than uniqueness rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RegistrationRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    #[must_use]
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Classify for RegistrationRepositoryError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateGuild(_) | Self::DuplicateChannel(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Self::InvalidPersistedData(_) | Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}
