//! Diesel row models for message content persistence.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::message_log_content;

/// Database row representation of archived content.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = message_log_content)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageContentRow {
    /// Message snowflake.
    pub message_id: i64,
    /// Message body.
    pub message_content: String,
    /// Author snowflake.
    pub author_id: i64,
    /// When the record was first saved.
    pub created_at: DateTime<Utc>,
}

/// Data for inserting archived content.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_log_content)]
pub struct NewMessageContentRow {
    /// Message snowflake.
    pub message_id: i64,
    /// Message body.
    pub message_content: String,
    /// Author snowflake.
    pub author_id: i64,
    /// When the record was first saved.
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` columns are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = message_log_content)]
pub struct MessageContentChangeset {
    /// Replacement body.
    pub message_content: Option<String>,
    /// Replacement author.
    pub author_id: Option<i64>,
}
