//! Diesel row models for guild registration persistence.

use diesel::Queryable;

/// Query result row for registration records.
///
/// Fields load by position from `(guild_id, channel_id)`.
#[derive(Debug, Clone, Copy, Queryable)]
pub struct RegistrationRow {
    /// Guild identifier.
    pub guild_id: i64,
    /// Registered channel identifier.
    pub channel_id: i64,
}
