//! Shared world state for guild registration BDD scenarios.

use std::num::NonZeroUsize;
use std::sync::Arc;

use papertrail::cache::adapters::LruRecordCache;
use papertrail::registration::{
    adapters::memory::InMemoryGuildRegistry,
    domain::{ChannelId, GuildId, GuildRegistration, RegistrationKind},
    services::{GuildRegistrationService, RegistrationServiceError},
};
use rstest::fixture;

/// Scenario world for registration behaviour tests.
pub struct RegistrationWorld {
    /// Audit-log registration service under test.
    pub service: GuildRegistrationService<InMemoryGuildRegistry>,
    /// Error returned by the last registration attempt, if it failed.
    pub last_error: Option<RegistrationServiceError>,
}

impl RegistrationWorld {
    /// Creates a world over an empty audit-log registry.
    #[must_use]
    pub fn new() -> Self {
        let kind = RegistrationKind::AuditLog;
        let capacity = NonZeroUsize::new(16).unwrap_or(NonZeroUsize::MIN);
        Self {
            service: GuildRegistrationService::new(
                Arc::new(InMemoryGuildRegistry::new(kind)),
                Arc::new(LruRecordCache::new(kind.cache_region(), capacity)),
            ),
            last_error: None,
        }
    }
}

impl Default for RegistrationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a guild id from step text.
pub fn guild_id(id: i64) -> Result<GuildId, eyre::Report> {
    GuildId::new(id).map_err(|err| eyre::eyre!("invalid guild id {id}: {err}"))
}

/// Parses a channel id from step text.
pub fn channel_id(id: i64) -> Result<ChannelId, eyre::Report> {
    ChannelId::new(id).map_err(|err| eyre::eyre!("invalid channel id {id}: {err}"))
}

/// Builds a registration from step text.
pub fn registration(guild: i64, channel: i64) -> Result<GuildRegistration, eyre::Report> {
    Ok(GuildRegistration::new(guild_id(guild)?, channel_id(channel)?))
}
