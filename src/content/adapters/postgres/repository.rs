//! `PostgreSQL` repository implementation for archived message content.

use super::{
    models::{MessageContentChangeset, MessageContentRow, NewMessageContentRow},
    schema::message_log_content,
};
use crate::content::{
    domain::{
        AuthorId, MessageContentChanges, MessageContentRecord, MessageId, MessageText,
        PersistedMessageContent,
    },
    ports::{ContentRepositoryError, ContentRepositoryResult, MessageContentRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by content adapters.
pub type ContentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed message content repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageContentRepository {
    pool: ContentPgPool,
}

impl PostgresMessageContentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ContentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ContentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ContentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ContentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ContentRepositoryError::persistence)?
    }
}

#[async_trait]
impl MessageContentRepository for PostgresMessageContentRepository {
    async fn insert(&self, record: &MessageContentRecord) -> ContentRepositoryResult<()> {
        let message_id = record.message_id();
        let new_row = NewMessageContentRow {
            message_id: message_id.value(),
            message_content: record.content().as_str().to_owned(),
            author_id: record.author_id().value(),
            created_at: record.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(message_log_content::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_write_error(err, message_id))?;
            Ok(())
        })
        .await
    }

    async fn exists(&self, message_id: MessageId) -> ContentRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                message_log_content::table
                    .filter(message_log_content::message_id.eq(message_id.value())),
            ))
            .get_result::<bool>(connection)
            .map_err(ContentRepositoryError::persistence)
        })
        .await
    }

    async fn find_by_id(
        &self,
        message_id: MessageId,
    ) -> ContentRepositoryResult<Option<MessageContentRecord>> {
        self.run_blocking(move |connection| {
            let row = message_log_content::table
                .filter(message_log_content::message_id.eq(message_id.value()))
                .select(MessageContentRow::as_select())
                .first::<MessageContentRow>(connection)
                .optional()
                .map_err(ContentRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn update_fields(
        &self,
        message_id: MessageId,
        changes: &MessageContentChanges,
    ) -> ContentRepositoryResult<()> {
        let changeset = MessageContentChangeset {
            message_content: changes.content.as_ref().map(|c| c.as_str().to_owned()),
            author_id: changes.author_id.map(AuthorId::value),
        };
        let nothing_to_write = changes.is_empty();

        self.run_blocking(move |connection| {
            let target = message_log_content::table
                .filter(message_log_content::message_id.eq(message_id.value()));

            // Diesel rejects an empty changeset, so only confirm the row.
            let matched = if nothing_to_write {
                diesel::select(diesel::dsl::exists(target))
                    .get_result::<bool>(connection)
                    .map(usize::from)
                    .map_err(ContentRepositoryError::persistence)?
            } else {
                connection
                    .transaction::<_, DieselError, _>(|tx| {
                        diesel::update(target).set(&changeset).execute(tx)
                    })
                    .map_err(|err| map_write_error(err, message_id))?
            };

            if matched == 0 {
                return Err(ContentRepositoryError::NotFound(message_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_by_id(&self, message_id: MessageId) -> ContentRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                message_log_content::table
                    .filter(message_log_content::message_id.eq(message_id.value())),
            )
            .execute(connection)
            .map_err(ContentRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> ContentRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                message_log_content::table.filter(message_log_content::created_at.lt(cutoff)),
            )
            .execute(connection)
            .map_err(ContentRepositoryError::persistence)?;
            u64::try_from(deleted).map_err(ContentRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_record(row: MessageContentRow) -> ContentRepositoryResult<MessageContentRecord> {
    let MessageContentRow {
        message_id,
        message_content,
        author_id,
        created_at,
    } = row;

    let data = PersistedMessageContent {
        message_id: MessageId::new(message_id)
            .map_err(ContentRepositoryError::invalid_persisted_data)?,
        content: MessageText::new(message_content)
            .map_err(ContentRepositoryError::invalid_persisted_data)?,
        author_id: AuthorId::new(author_id)
            .map_err(ContentRepositoryError::invalid_persisted_data)?,
        created_at,
    };
    Ok(MessageContentRecord::from_persisted(data))
}

/// Maps Diesel write failures to semantic repository errors.
///
/// The primary key is the table's only unique constraint.
fn map_write_error(err: DieselError, message_id: MessageId) -> ContentRepositoryError {
    let DieselError::DatabaseError(kind, info) = &err else {
        return ContentRepositoryError::persistence(err);
    };

    match kind {
        DatabaseErrorKind::UniqueViolation => ContentRepositoryError::DuplicateMessage(message_id),
        DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
            ContentRepositoryError::ConstraintViolation(info.message().to_owned())
        }
        _ => ContentRepositoryError::persistence(err),
    }
}
