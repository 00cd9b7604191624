//! `PostgreSQL` repository implementation for guild registrations.

use super::{models::RegistrationRow, queries::RegistrationQueries};
use crate::registration::{
    domain::{ChannelId, GuildId, GuildRegistration, RegistrationKind},
    ports::{
        GuildRegistrationRepository, RegistrationRepositoryError, RegistrationRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by registration adapters.
pub type RegistrationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed registration repository for one namespace.
#[derive(Debug, Clone)]
pub struct PostgresGuildRegistry {
    pool: RegistrationPgPool,
    kind: RegistrationKind,
    queries: RegistrationQueries,
}

impl PostgresGuildRegistry {
    /// Creates a repository for `kind` from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: RegistrationPgPool, kind: RegistrationKind) -> Self {
        Self {
            pool,
            kind,
            queries: RegistrationQueries::for_kind(kind),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RegistrationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RegistrationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(RegistrationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RegistrationRepositoryError::persistence)?
    }
}

#[async_trait]
impl GuildRegistrationRepository for PostgresGuildRegistry {
    fn kind(&self) -> RegistrationKind {
        self.kind
    }

    async fn insert(&self, registration: &GuildRegistration) -> RegistrationRepositoryResult<()> {
        let queries = self.queries;
        let guild_id = registration.guild_id();
        let channel_id = registration.channel_id();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    (queries.insert)(tx, guild_id.value(), channel_id.value())
                })
                .map_err(|err| map_write_error(err, queries, guild_id, channel_id))?;
            Ok(())
        })
        .await
    }

    async fn exists(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool> {
        let queries = self.queries;
        self.run_blocking(move |connection| {
            (queries.exists)(connection, guild_id.value())
                .map_err(RegistrationRepositoryError::persistence)
        })
        .await
    }

    async fn find_by_id(
        &self,
        guild_id: GuildId,
    ) -> RegistrationRepositoryResult<Option<GuildRegistration>> {
        let queries = self.queries;
        self.run_blocking(move |connection| {
            let row = (queries.find)(connection, guild_id.value())
                .map_err(RegistrationRepositoryError::persistence)?;
            row.map(row_to_registration).transpose()
        })
        .await
    }

    async fn update_channel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> RegistrationRepositoryResult<()> {
        let queries = self.queries;
        self.run_blocking(move |connection| {
            let updated_count = connection
                .transaction::<_, DieselError, _>(|tx| {
                    (queries.update_channel)(tx, guild_id.value(), channel_id.value())
                })
                .map_err(|err| map_write_error(err, queries, guild_id, channel_id))?;

            if updated_count == 0 {
                return Err(RegistrationRepositoryError::NotFound(guild_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_by_id(&self, guild_id: GuildId) -> RegistrationRepositoryResult<bool> {
        let queries = self.queries;
        self.run_blocking(move |connection| {
            let deleted_count = connection
                .transaction::<_, DieselError, _>(|tx| (queries.delete)(tx, guild_id.value()))
                .map_err(RegistrationRepositoryError::persistence)?;
            Ok(deleted_count > 0)
        })
        .await
    }
}

fn row_to_registration(row: RegistrationRow) -> RegistrationRepositoryResult<GuildRegistration> {
    let guild_id =
        GuildId::new(row.guild_id).map_err(RegistrationRepositoryError::invalid_persisted_data)?;
    let channel_id = ChannelId::new(row.channel_id)
        .map_err(RegistrationRepositoryError::invalid_persisted_data)?;
    Ok(GuildRegistration::new(guild_id, channel_id))
}

/// Maps Diesel write failures to semantic repository errors.
///
/// A unique violation on the channel constraint is a channel conflict; any
/// other unique violation can only be the primary key.
fn map_write_error(
    err: DieselError,
    queries: RegistrationQueries,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> RegistrationRepositoryError {
    let DieselError::DatabaseError(kind, info) = &err else {
        return RegistrationRepositoryError::persistence(err);
    };

    match kind {
        DatabaseErrorKind::UniqueViolation
            if info.constraint_name() == Some(queries.channel_unique) =>
        {
            RegistrationRepositoryError::DuplicateChannel(channel_id)
        }
        DatabaseErrorKind::UniqueViolation => RegistrationRepositoryError::DuplicateGuild(guild_id),
        DatabaseErrorKind::NotNullViolation
        | DatabaseErrorKind::CheckViolation
        | DatabaseErrorKind::ForeignKeyViolation => {
            RegistrationRepositoryError::ConstraintViolation(info.message().to_owned())
        }
        _ => RegistrationRepositoryError::persistence(err),
    }
}
