//! Message content repository tests against a live cluster.

use crate::postgres::helpers::{PostgresCluster, TestDatabase, postgres_cluster, test_runtime};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::DefaultClock;
use papertrail::content::{
    adapters::postgres::PostgresMessageContentRepository,
    domain::{
        AuthorId, MessageContentChanges, MessageContentRecord, MessageId, MessageText,
        NewMessageContent, PersistedMessageContent,
    },
    ports::{ContentRepositoryError, MessageContentRepository},
};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

struct ContentContext {
    rt: Runtime,
    repository: PostgresMessageContentRepository,
    _database: TestDatabase,
}

#[fixture]
fn content_context(postgres_cluster: Option<PostgresCluster>) -> Option<ContentContext> {
    let cluster = postgres_cluster?;
    let database = TestDatabase::create(cluster, "test_content").expect("database");
    Some(ContentContext {
        rt: test_runtime().expect("tokio runtime"),
        repository: PostgresMessageContentRepository::new(database.pool(2).expect("pool")),
        _database: database,
    })
}

fn message(id: i64) -> MessageId {
    MessageId::new(id).expect("valid message id")
}

fn text(value: &str) -> MessageText {
    MessageText::new(value).expect("valid text")
}

fn author(id: i64) -> AuthorId {
    AuthorId::new(id).expect("valid author id")
}

fn saved_now(id: i64, body: &str) -> MessageContentRecord {
    MessageContentRecord::new(
        NewMessageContent {
            message_id: message(id),
            content: text(body),
            author_id: author(42),
        },
        &DefaultClock,
    )
}

fn created_at(id: i64, at: DateTime<Utc>) -> MessageContentRecord {
    MessageContentRecord::from_persisted(PersistedMessageContent {
        message_id: message(id),
        content: text("aged"),
        author_id: author(42),
        created_at: at,
    })
}

#[rstest]
fn insert_then_find_is_lossless(content_context: Option<ContentContext>) {
    let Some(context) = content_context else {
        return;
    };
    let record = saved_now(1, "héllo, archive");

    context.rt.block_on(async {
        context.repository.insert(&record).await.expect("insert");

        let found = context
            .repository
            .find_by_id(message(1))
            .await
            .expect("find")
            .expect("row present");
        assert_eq!(found, record, "timestamp must survive at stored precision");
        assert!(context.repository.exists(message(1)).await.expect("exists"));
        assert_eq!(
            context.repository.find_by_id(message(2)).await.expect("find"),
            None
        );
    });
}

#[rstest]
fn duplicate_message_keeps_the_first_row(content_context: Option<ContentContext>) {
    let Some(context) = content_context else {
        return;
    };

    context.rt.block_on(async {
        context
            .repository
            .insert(&saved_now(1, "first"))
            .await
            .expect("insert");

        let second = context.repository.insert(&saved_now(1, "second")).await;
        assert!(matches!(
            second,
            Err(ContentRepositoryError::DuplicateMessage(id)) if id == message(1)
        ));
        let kept = context
            .repository
            .find_by_id(message(1))
            .await
            .expect("find")
            .expect("row present");
        assert_eq!(kept.content().as_str(), "first");
    });
}

#[rstest]
fn update_fields_writes_only_supplied_columns(content_context: Option<ContentContext>) {
    let Some(context) = content_context else {
        return;
    };
    let original = saved_now(3, "before");

    context.rt.block_on(async {
        context.repository.insert(&original).await.expect("insert");
        let changes = MessageContentChanges {
            content: Some(text("after")),
            author_id: None,
        };

        context
            .repository
            .update_fields(message(3), &changes)
            .await
            .expect("update");

        let updated = context
            .repository
            .find_by_id(message(3))
            .await
            .expect("find")
            .expect("row present");
        assert_eq!(updated.content().as_str(), "after");
        assert_eq!(updated.author_id(), original.author_id());
        assert_eq!(updated.created_at(), original.created_at());
    });
}

#[rstest]
fn update_and_delete_of_missing_rows(content_context: Option<ContentContext>) {
    let Some(context) = content_context else {
        return;
    };
    let changes = MessageContentChanges {
        content: None,
        author_id: Some(author(7)),
    };

    context.rt.block_on(async {
        let missing = context.repository.update_fields(message(404), &changes).await;
        assert!(matches!(
            missing,
            Err(ContentRepositoryError::NotFound(id)) if id == message(404)
        ));

        context
            .repository
            .insert(&saved_now(4, "short-lived"))
            .await
            .expect("insert");
        assert!(context.repository.delete_by_id(message(4)).await.expect("delete"));
        assert!(!context.repository.delete_by_id(message(4)).await.expect("again"));
    });
}

#[rstest]
fn delete_older_than_is_strict(content_context: Option<ContentContext>) {
    let Some(context) = content_context else {
        return;
    };
    let cutoff = saved_now(99, "clock").created_at() - TimeDelta::days(30);

    context.rt.block_on(async {
        for record in [
            created_at(1, cutoff - TimeDelta::microseconds(1)),
            created_at(2, cutoff),
            created_at(3, cutoff + TimeDelta::days(1)),
        ] {
            context.repository.insert(&record).await.expect("seed");
        }

        let removed = context
            .repository
            .delete_older_than(cutoff)
            .await
            .expect("sweep");

        assert_eq!(removed, 1);
        assert!(!context.repository.exists(message(1)).await.expect("exists"));
        assert!(context.repository.exists(message(2)).await.expect("exists"));
        assert!(context.repository.exists(message(3)).await.expect("exists"));
    });
}
