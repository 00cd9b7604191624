//! Advisory lock manager tests against a live cluster.

use crate::postgres::helpers::{PostgresCluster, TestDatabase, postgres_cluster, test_runtime};
use papertrail::error::{Classify, ErrorKind};
use papertrail::lock::{
    LockError, LockKey, LockManager, LockOwner, LockSettings, adapters::PostgresLockManager,
};
use rstest::{fixture, rstest};
use std::time::Duration;
use tokio::runtime::Runtime;

const SHORT_WAIT: Duration = Duration::from_millis(200);

struct LockContext {
    rt: Runtime,
    database: TestDatabase,
}

impl LockContext {
    fn manager(&self, pool_size: u32, settings: LockSettings) -> PostgresLockManager {
        PostgresLockManager::new(
            self.database.pool(pool_size).expect("lock pool"),
            settings,
        )
    }
}

#[fixture]
fn lock_context(postgres_cluster: Option<PostgresCluster>) -> Option<LockContext> {
    let cluster = postgres_cluster?;
    let database = TestDatabase::create(cluster, "test_locks").expect("lock database");
    let rt = test_runtime().expect("tokio runtime");
    Some(LockContext { rt, database })
}

fn key(name: &str) -> LockKey {
    LockKey::new(name)
}

#[rstest]
fn key_is_exclusive_across_managers(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let first = context.manager(2, LockSettings::unbounded());
    let second = context.manager(2, LockSettings::with_wait_timeout(SHORT_WAIT));

    context.rt.block_on(async {
        let held = first
            .acquire(&key("message:1"), LockOwner::new())
            .await
            .expect("first manager takes the key");

        let err = second
            .acquire(&key("message:1"), LockOwner::new())
            .await
            .expect_err("second manager must wait");
        assert!(matches!(err, LockError::Timeout { waited, .. } if waited == SHORT_WAIT));
        assert_eq!(err.kind(), ErrorKind::LockUnavailable);

        first.release(held).await.expect("release");
        let handle = second
            .acquire(&key("message:1"), LockOwner::new())
            .await
            .expect("key free after release");
        second.release(handle).await.expect("release");
    });
}

#[rstest]
fn distinct_keys_are_held_at_once(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let manager = context.manager(2, LockSettings::with_wait_timeout(SHORT_WAIT));

    context.rt.block_on(async {
        let one = manager
            .acquire(&key("message:1"), LockOwner::new())
            .await
            .expect("key 1");
        let two = manager
            .acquire(&key("message:2"), LockOwner::new())
            .await
            .expect("key 2 is independent");
        manager.release(one).await.expect("release 1");
        manager.release(two).await.expect("release 2");
    });
}

#[rstest]
fn reentrant_holds_release_on_last_release(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let manager = context.manager(2, LockSettings::unbounded());
    let rival = context.manager(1, LockSettings::with_wait_timeout(SHORT_WAIT));
    let owner = LockOwner::new();

    context.rt.block_on(async {
        let outer = manager
            .acquire(&key("message:7"), owner)
            .await
            .expect("outer hold");
        let inner = manager
            .acquire(&key("message:7"), owner)
            .await
            .expect("same owner re-enters");
        assert_eq!(manager.hold_count(&outer), 2);

        manager.release(inner).await.expect("inner release");
        assert_eq!(manager.hold_count(&outer), 1);
        assert!(
            rival
                .acquire(&key("message:7"), LockOwner::new())
                .await
                .is_err(),
            "one hold remains"
        );

        manager.release(outer).await.expect("outer release");
        let handle = rival
            .acquire(&key("message:7"), LockOwner::new())
            .await
            .expect("fully released");
        rival.release(handle).await.expect("release");
    });
}

#[rstest]
fn release_by_stranger_is_rejected(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let manager = context.manager(1, LockSettings::unbounded());

    context.rt.block_on(async {
        let handle = manager
            .acquire(&key("message:3"), LockOwner::new())
            .await
            .expect("hold");
        let forged = papertrail::lock::LockHandle::new(key("message:3"), LockOwner::new());

        let err = manager
            .release(forged)
            .await
            .expect_err("stranger cannot release");
        assert!(matches!(err, LockError::NotHeld { .. }));
        manager.release(handle).await.expect("owner release");
    });
}

#[rstest]
fn abandoned_waiter_returns_its_grant(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let holder = context.manager(1, LockSettings::unbounded());
    let quitter = context.manager(1, LockSettings::unbounded());
    let latecomer = context.manager(1, LockSettings::with_wait_timeout(Duration::from_secs(5)));

    context.rt.block_on(async {
        let held = holder
            .acquire(&key("message:9"), LockOwner::new())
            .await
            .expect("hold");
        let gave_up = tokio::time::timeout(
            Duration::from_millis(100),
            quitter.acquire(&key("message:9"), LockOwner::new()),
        )
        .await;
        assert!(gave_up.is_err(), "waiter should still be queued");

        holder.release(held).await.expect("release");
        let handle = latecomer
            .acquire(&key("message:9"), LockOwner::new())
            .await
            .expect("abandoned grant was handed back");
        latecomer.release(handle).await.expect("release");
    });
}

#[rstest]
fn waiters_beyond_pool_size_queue_instead_of_failing(lock_context: Option<LockContext>) {
    let Some(context) = lock_context else {
        return;
    };
    let pool = context
        .database
        .pool_with_checkout_timeout(1, SHORT_WAIT)
        .expect("single connection pool");
    let manager = PostgresLockManager::new(pool, LockSettings::with_wait_timeout(Duration::from_secs(5)));

    context.rt.block_on(async {
        let held = manager
            .acquire(&key("message:5"), LockOwner::new())
            .await
            .expect("hold");
        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let waiter = manager.clone();
                tokio::spawn(async move {
                    let handle = waiter.acquire(&key("message:5"), LockOwner::new()).await?;
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    waiter.release(handle).await
                })
            })
            .collect();

        tokio::time::sleep(SHORT_WAIT * 2).await;
        manager.release(held).await.expect("release");

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(10), waiter)
                .await
                .expect("waiter finishes")
                .expect("waiter task")
                .expect("waiter acquired and released");
        }
    });
}
