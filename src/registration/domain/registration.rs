//! Guild log-channel registration.

use super::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};

/// A guild's registered log channel.
///
/// The guild identifier is the key and never changes; only the channel can
/// be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRegistration {
    guild_id: GuildId,
    channel_id: ChannelId,
}

impl GuildRegistration {
    /// Creates a registration.
    #[must_use]
    pub const fn new(guild_id: GuildId, channel_id: ChannelId) -> Self {
        Self {
            guild_id,
            channel_id,
        }
    }

    /// Returns the guild identifier.
    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Returns the registered channel.
    #[must_use]
    pub const fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Points the registration at a new channel.
    ///
    /// Returns `true` when the channel actually changed.
    pub fn reassign_channel(&mut self, channel_id: ChannelId) -> bool {
        if self.channel_id == channel_id {
            return false;
        }
        self.channel_id = channel_id;
        true
    }
}
