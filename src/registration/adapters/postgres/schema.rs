//! Diesel schema for guild registration persistence.

diesel::table! {
    /// Guilds whose audit log events are forwarded to a channel.
    audit_log_registrations (guild_id) {
        /// Guild snowflake.
        guild_id -> Int8,
        /// Destination channel snowflake, unique across the table.
        channel_id -> Int8,
    }
}

diesel::table! {
    /// Guilds whose message events are forwarded to a channel.
    message_log_registrations (guild_id) {
        /// Guild snowflake.
        guild_id -> Int8,
        /// Destination channel snowflake, unique across the table.
        channel_id -> Int8,
    }
}
