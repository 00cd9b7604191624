//! Contended operations on a single message.

use std::sync::Arc;

use crate::in_memory::helpers::{ContentStack, content_stack, message, new_content};
use papertrail::content::{
    domain::{MessageContentUpdate, MessageText},
    ports::{ContentRepositoryError, ContentServiceError, MessageContentOperations},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_saves_store_exactly_one_record(content_stack: ContentStack) {
    let tasks: Vec<_> = (0..8)
        .map(|n| {
            let service = Arc::clone(&content_stack.service);
            tokio::spawn(async move { service.save(new_content(1, &format!("copy {n}"), 42)).await })
        })
        .collect();

    let mut stored = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.expect("task") {
            Ok(_) => stored += 1,
            Err(ContentServiceError::Repository(ContentRepositoryError::DuplicateMessage(_))) => {
                duplicates += 1;
            }
            Err(other) => panic!("unexpected save failure: {other}"),
        }
    }

    assert_eq!(stored, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(content_stack.repository.len().expect("len"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_updates_all_apply_and_one_wins(content_stack: ContentStack) {
    content_stack
        .service
        .save(new_content(1, "original", 42))
        .await
        .expect("save");

    let texts: Vec<String> = (0..6).map(|n| format!("edit {n}")).collect();
    let tasks: Vec<_> = texts
        .iter()
        .cloned()
        .map(|text| {
            let service = Arc::clone(&content_stack.service);
            tokio::spawn(async move {
                let update = MessageContentUpdate::new()
                    .with_content(MessageText::new(text).expect("valid text"));
                service.update(message(1), update).await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("task").expect("update");
    }

    let last = content_stack
        .service
        .view(message(1))
        .await
        .expect("view");
    assert!(texts.iter().any(|text| text == last.content().as_str()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn views_racing_a_delete_leave_no_stale_cache_entry(content_stack: ContentStack) {
    let saved = content_stack
        .service
        .save(new_content(1, "doomed", 42))
        .await
        .expect("save");

    let viewers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&content_stack.service);
            tokio::spawn(async move { service.view(message(1)).await })
        })
        .collect();
    let deleter = {
        let service = Arc::clone(&content_stack.service);
        tokio::spawn(async move { service.delete(message(1)).await })
    };

    deleter.await.expect("task").expect("delete");
    for viewer in viewers {
        match viewer.await.expect("task") {
            Ok(record) => assert_eq!(record, saved),
            Err(ContentServiceError::Repository(ContentRepositoryError::NotFound(_))) => {}
            Err(other) => panic!("unexpected view failure: {other}"),
        }
    }
    assert!(matches!(
        content_stack.service.view(message(1)).await,
        Err(ContentServiceError::Repository(ContentRepositoryError::NotFound(_)))
    ));
}
