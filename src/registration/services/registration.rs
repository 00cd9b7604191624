//! Service layer for guild log-channel registrations.
//!
//! Provides [`GuildRegistrationService`], which owns the create, read,
//! update, and delete rules for one registration namespace and keeps the
//! namespace's cache region coherent.

use crate::cache::{self, CacheError, RecordCache};
use crate::error::{Classify, ErrorKind};
use crate::registration::{
    domain::{ChannelId, GuildId, GuildRegistration, RegistrationDomainError, RegistrationKind},
    ports::{GuildRegistrationRepository, RegistrationRepositoryError},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for registration operations.
#[derive(Debug, Error)]
pub enum RegistrationServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RegistrationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RegistrationRepositoryError),
    /// Cache operation failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl Classify for RegistrationServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
            Self::Cache(err) => err.kind(),
        }
    }
}

/// Result type for registration service operations.
pub type RegistrationServiceResult<T> = Result<T, RegistrationServiceError>;

/// Operation contract exposed to the boundary layer for one namespace.
#[async_trait]
pub trait GuildRegistrationOperations: Send + Sync {
    /// Returns the namespace served.
    fn kind(&self) -> RegistrationKind;

    /// Registers a guild's log channel.
    async fn register(
        &self,
        registration: GuildRegistration,
    ) -> RegistrationServiceResult<GuildRegistration>;

    /// Returns a guild's registration.
    async fn view(&self, guild_id: GuildId) -> RegistrationServiceResult<GuildRegistration>;

    /// Points a guild's registration at a new channel.
    async fn update(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationServiceResult<GuildRegistration>;

    /// Removes a guild's registration.
    async fn delete(&self, guild_id: GuildId) -> RegistrationServiceResult<()>;
}

/// Registration orchestration service for one namespace.
pub struct GuildRegistrationService<R>
where
    R: GuildRegistrationRepository,
{
    repository: Arc<R>,
    cache: Arc<dyn RecordCache<GuildRegistration>>,
}

impl<R> Clone for GuildRegistrationService<R>
where
    R: GuildRegistrationRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R> GuildRegistrationService<R>
where
    R: GuildRegistrationRepository,
{
    /// Creates a new registration service.
    #[must_use]
    pub fn new(repository: Arc<R>, cache: Arc<dyn RecordCache<GuildRegistration>>) -> Self {
        Self { repository, cache }
    }

    /// Registers a guild's log channel.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::DuplicateGuild`] when the guild
    /// is already registered, [`RegistrationRepositoryError::DuplicateChannel`]
    /// when the channel is taken, or another repository error when
    /// persistence fails.
    pub async fn register(
        &self,
        registration: GuildRegistration,
    ) -> RegistrationServiceResult<GuildRegistration> {
        let guild_id = registration.guild_id();
        if self.repository.exists(guild_id).await? {
            return Err(RegistrationRepositoryError::DuplicateGuild(guild_id).into());
        }

        self.repository.insert(&registration).await?;
        tracing::debug!(
            kind = %self.repository.kind(),
            %guild_id,
            channel_id = %registration.channel_id(),
            "registered guild"
        );
        Ok(registration)
    }

    /// Returns a guild's registration, reading through the cache.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::NotFound`] when the guild is
    /// not registered.
    pub async fn view(&self, guild_id: GuildId) -> RegistrationServiceResult<GuildRegistration> {
        cache::get_or_load(self.cache.as_ref(), guild_id.into(), || {
            self.find_by_id_or_error(guild_id)
        })
        .await
    }

    /// Points a guild's registration at a new channel.
    ///
    /// Nothing is written when the channel is unchanged. The cache entry is
    /// invalidated either way.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::NotFound`] when the guild is
    /// not registered or [`RegistrationRepositoryError::DuplicateChannel`]
    /// when the channel belongs to another guild.
    pub async fn update(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationServiceResult<GuildRegistration> {
        let mut registration = self.find_by_id_or_error(guild_id).await?;

        if registration.reassign_channel(channel_id) {
            self.repository.update_channel(guild_id, channel_id).await?;
        }
        cache::invalidate(self.cache.as_ref(), guild_id)?;

        tracing::debug!(
            kind = %self.repository.kind(),
            %guild_id,
            %channel_id,
            "updated guild registration"
        );
        Ok(registration)
    }

    /// Removes a guild's registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::NotFound`] when the guild is
    /// not registered.
    pub async fn delete(&self, guild_id: GuildId) -> RegistrationServiceResult<()> {
        if !self.repository.exists(guild_id).await? {
            return Err(RegistrationRepositoryError::NotFound(guild_id).into());
        }

        if self.repository.delete_by_id(guild_id).await? {
            tracing::debug!(kind = %self.repository.kind(), %guild_id, "deleted guild registration");
        } else {
            tracing::warn!(
                kind = %self.repository.kind(),
                %guild_id,
                "guild registration vanished before delete"
            );
        }
        cache::invalidate(self.cache.as_ref(), guild_id)?;
        Ok(())
    }

    async fn find_by_id_or_error(
        &self,
        guild_id: GuildId,
    ) -> RegistrationServiceResult<GuildRegistration> {
        self.repository
            .find_by_id(guild_id)
            .await?
            .ok_or_else(|| RegistrationRepositoryError::NotFound(guild_id).into())
    }
}

#[async_trait]
impl<R> GuildRegistrationOperations for GuildRegistrationService<R>
where
    R: GuildRegistrationRepository,
{
    fn kind(&self) -> RegistrationKind {
        self.repository.kind()
    }

    async fn register(
        &self,
        registration: GuildRegistration,
    ) -> RegistrationServiceResult<GuildRegistration> {
        Self::register(self, registration).await
    }

    async fn view(&self, guild_id: GuildId) -> RegistrationServiceResult<GuildRegistration> {
        Self::view(self, guild_id).await
    }

    async fn update(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationServiceResult<GuildRegistration> {
        Self::update(self, guild_id, channel_id).await
    }

    async fn delete(&self, guild_id: GuildId) -> RegistrationServiceResult<()> {
        Self::delete(self, guild_id).await
    }
}
