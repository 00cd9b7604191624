//! Diesel schema for message content persistence.

diesel::table! {
    /// Archived message bodies, kept for thirty days.
    message_log_content (message_id) {
        /// Message snowflake.
        message_id -> Int8,
        /// Message body.
        #[max_length = 4000]
        message_content -> Varchar,
        /// Author snowflake.
        author_id -> Int8,
        /// When the record was first saved.
        created_at -> Timestamptz,
    }
}
