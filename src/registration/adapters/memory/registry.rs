//! In-memory repository for guild registration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::registration::{
    domain::{ChannelId, GuildId, GuildRegistration, RegistrationKind},
    ports::{
        GuildRegistrationRepository, RegistrationRepositoryError, RegistrationRepositoryResult,
    },
};

/// Thread-safe in-memory registration repository for one namespace.
#[derive(Debug, Clone)]
pub struct InMemoryGuildRegistry {
    kind: RegistrationKind,
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    registrations: HashMap<GuildId, GuildRegistration>,
    channel_index: HashMap<ChannelId, GuildId>,
}

impl InMemoryGuildRegistry {
    /// Creates an empty registry for the given namespace.
    #[must_use]
    pub fn new(kind: RegistrationKind) -> Self {
        Self {
            kind,
            state: Arc::new(RwLock::new(InMemoryRegistryState::default())),
        }
    }

    /// Returns the number of stored registrations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationRepositoryError::Persistence`] when the state
    /// lock is poisoned.
    pub fn len(&self) -> RegistrationRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.registrations.len())
    }
}

#[async_trait]
impl GuildRegistrationRepository for InMemoryGuildRegistry {
    fn kind(&self) -> RegistrationKind {
        self.kind
    }

    async fn insert(&self, registration: &GuildRegistration) -> RegistrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let guild_id = registration.guild_id();
        let channel_id = registration.channel_id();

        if state.registrations.contains_key(&guild_id) {
            return Err(RegistrationRepositoryError::DuplicateGuild(guild_id));
        }

        if state.channel_index.contains_key(&channel_id) {
            return Err(RegistrationRepositoryError::DuplicateChannel(channel_id));
        }

        state.channel_index.insert(channel_id, guild_id);
        state.registrations.insert(guild_id, *registration);
        Ok(())
    }

    async fn exists(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool> {
        let state = self.state.read().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.registrations.contains_key(&guild_id))
    }

    async fn find_by_id(
        &self,
        guild_id: GuildId,
    ) -> RegistrationRepositoryResult<Option<GuildRegistration>> {
        let state = self.state.read().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.registrations.get(&guild_id).copied())
    }

    async fn update_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let old_channel = state
            .registrations
            .get(&guild_id)
            .ok_or(RegistrationRepositoryError::NotFound(guild_id))?
            .channel_id();

        if old_channel != channel_id {
            if let Some(&owner) = state.channel_index.get(&channel_id)
                && owner != guild_id
            {
                return Err(RegistrationRepositoryError::DuplicateChannel(channel_id));
            }
            state.channel_index.remove(&old_channel);
            state.channel_index.insert(channel_id, guild_id);
        }

        state
            .registrations
            .insert(guild_id, GuildRegistration::new(guild_id, channel_id));
        Ok(())
    }

    async fn delete_by_id(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            RegistrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let Some(removed) = state.registrations.remove(&guild_id) else {
            return Ok(false);
        };
        state.channel_index.remove(&removed.channel_id());
        Ok(true)
    }
}
