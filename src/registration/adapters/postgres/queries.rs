//! Typed queries for each registration table.
//!
//! Both namespaces share one row shape but live in distinct Diesel tables,
//! so the query set is generated once per table and selected by
//! [`RegistrationKind`].

use super::models::RegistrationRow;
use crate::registration::domain::RegistrationKind;
use diesel::QueryResult;
use diesel::pg::PgConnection;

/// Query functions and constraint names for one registration table.
#[derive(Clone, Copy)]
pub(super) struct RegistrationQueries {
    pub(super) channel_unique: &'static str,
    pub(super) insert: fn(&mut PgConnection, i64, i64) -> QueryResult<usize>,
    pub(super) exists: fn(&mut PgConnection, i64) -> QueryResult<bool>,
    pub(super) find: fn(&mut PgConnection, i64) -> QueryResult<Option<RegistrationRow>>,
    pub(super) update_channel: fn(&mut PgConnection, i64, i64) -> QueryResult<usize>,
    pub(super) delete: fn(&mut PgConnection, i64) -> QueryResult<usize>,
}

impl std::fmt::Debug for RegistrationQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationQueries")
            .field("channel_unique", &self.channel_unique)
            .finish_non_exhaustive()
    }
}

impl RegistrationQueries {
    pub(super) const fn for_kind(kind: RegistrationKind) -> Self {
        match kind {
            RegistrationKind::AuditLog => audit_log::QUERIES,
            RegistrationKind::MessageLog => message_log::QUERIES,
        }
    }
}

macro_rules! registration_queries {
    ($module:ident, $table:ident, $channel_unique:literal) => {
        mod $module {
            use super::{RegistrationQueries, RegistrationRow};
            use crate::registration::adapters::postgres::schema::$table::dsl;
            use diesel::dsl::{exists, select};
            use diesel::pg::PgConnection;
            use diesel::prelude::*;

            pub(super) const QUERIES: RegistrationQueries =
                RegistrationQueries {
                    channel_unique: $channel_unique,
                    insert,
                    exists: exists_by_id,
                    find,
                    update_channel,
                    delete,
                };

            fn insert(
                connection: &mut PgConnection,
                guild_id: i64,
                channel_id: i64,
            ) -> QueryResult<usize> {
                diesel::insert_into(dsl::$table)
                    .values((dsl::guild_id.eq(guild_id), dsl::channel_id.eq(channel_id)))
                    .execute(connection)
            }

            fn exists_by_id(connection: &mut PgConnection, guild_id: i64) -> QueryResult<bool> {
                select(exists(dsl::$table.filter(dsl::guild_id.eq(guild_id))))
                    .get_result(connection)
            }

            fn find(
                connection: &mut PgConnection,
                guild_id: i64,
            ) -> QueryResult<Option<RegistrationRow>> {
                dsl::$table
                    .find(guild_id)
                    .select((dsl::guild_id, dsl::channel_id))
                    .first::<RegistrationRow>(connection)
                    .optional()
            }

            fn update_channel(
                connection: &mut PgConnection,
                guild_id: i64,
                channel_id: i64,
            ) -> QueryResult<usize> {
                diesel::update(dsl::$table.find(guild_id))
                    .set(dsl::channel_id.eq(channel_id))
                    .execute(connection)
            }

            fn delete(connection: &mut PgConnection, guild_id: i64) -> QueryResult<usize> {
                diesel::delete(dsl::$table.find(guild_id)).execute(connection)
            }
        }
    };
}

registration_queries!(
    audit_log,
    audit_log_registrations,
    "uq_audit_log_registrations_channel"
);
registration_queries!(
    message_log,
    message_log_registrations,
    "uq_message_log_registrations_channel"
);
