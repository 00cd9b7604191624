//! `PostgreSQL` advisory lock manager.
//!
//! Each held key pins one pooled connection holding a session-level
//! `pg_advisory_lock` on a 64-bit hash of the key. `PostgreSQL` grants
//! contended advisory locks in request order, which gives fairness across
//! every process sharing the database. Re-entrant holds by the same owner
//! are counted locally and never reach the server.
//!
//! A waiter occupies a pool connection while Postgres queues it. Callers
//! first pass a FIFO gate with one permit per pool connection, so waiters
//! beyond the pool size queue in-process instead of timing out on
//! connection checkout. The wait timeout covers both queues.

use crate::lock::{LockError, LockHandle, LockKey, LockManager, LockOwner, LockResult, LockSettings};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel::sql_types::{Bool, Text};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore, oneshot};
use tokio::time::Instant;
use tracing::warn;

/// `PostgreSQL` connection pool type used for advisory locks.
pub type LockPgPool = Pool<ConnectionManager<PgConnection>>;

type LockConnection = PooledConnection<ConnectionManager<PgConnection>>;

const ADVISORY_LOCK_SQL: &str = "SELECT pg_advisory_lock(hashtextextended($1, 0))";
const ADVISORY_UNLOCK_SQL: &str =
    "SELECT pg_advisory_unlock(hashtextextended($1, 0)) AS released";
const ADVISORY_UNLOCK_ALL_SQL: &str = "SELECT pg_advisory_unlock_all()";

#[derive(QueryableByName)]
struct UnlockRow {
    #[diesel(sql_type = Bool)]
    released: bool,
}

struct Session {
    owner: LockOwner,
    holds: u32,
    connection: LockConnection,
    permit: OwnedSemaphorePermit,
}

/// Lock manager backed by `PostgreSQL` session advisory locks.
#[derive(Clone)]
pub struct PostgresLockManager {
    pool: LockPgPool,
    settings: LockSettings,
    gate: Arc<Semaphore>,
    sessions: Arc<Mutex<HashMap<LockKey, Session>>>,
}

impl PostgresLockManager {
    /// Creates a manager drawing lock sessions from `pool`.
    #[must_use]
    pub fn new(pool: LockPgPool, settings: LockSettings) -> Self {
        let permits = usize::try_from(pool.max_size())
            .map_or(Semaphore::MAX_PERMITS, |size| size.min(Semaphore::MAX_PERMITS));
        Self {
            pool,
            settings,
            gate: Arc::new(Semaphore::new(permits)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<LockKey, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reenter(&self, key: &LockKey, owner: LockOwner) -> Option<LockHandle> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(key).filter(|s| s.owner == owner)?;
        session.holds = session.holds.saturating_add(1);
        Some(LockHandle::new(key.clone(), owner))
    }

    /// Waits for a pool slot, returning the permit and the remaining wait
    /// budget.
    async fn admit(&self, key: &LockKey) -> LockResult<(OwnedSemaphorePermit, Option<Duration>)> {
        let closed =
            |_: AcquireError| LockError::unavailable(io::Error::other("lock gate closed"));
        let Some(limit) = self.settings.wait_timeout else {
            let permit = Arc::clone(&self.gate).acquire_owned().await.map_err(closed)?;
            return Ok((permit, None));
        };

        let started = Instant::now();
        let timed_out = || LockError::Timeout {
            key: key.clone(),
            waited: limit,
        };
        let permit = tokio::time::timeout(limit, Arc::clone(&self.gate).acquire_owned())
            .await
            .map_err(|_| timed_out())?
            .map_err(closed)?;
        let remaining = limit.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return Err(timed_out());
        }
        Ok((permit, Some(remaining)))
    }
}

fn lock_session(
    pool: &LockPgPool,
    key: &LockKey,
    budget: Option<Duration>,
    wait_timeout: Option<Duration>,
) -> LockResult<LockConnection> {
    let mut connection = pool.get().map_err(LockError::unavailable)?;
    let timeout_ms = budget.map_or(0, |limit| limit.as_millis().max(1));
    diesel::sql_query(format!("SET lock_timeout = {timeout_ms}"))
        .execute(&mut *connection)
        .map_err(LockError::unavailable)?;
    diesel::sql_query(ADVISORY_LOCK_SQL)
        .bind::<Text, _>(key.as_str())
        .execute(&mut *connection)
        .map_err(|err| map_lock_error(err, key, wait_timeout))?;
    Ok(connection)
}

fn unlock_session(connection: &mut PgConnection, key: &LockKey) -> LockResult<()> {
    let outcome = diesel::sql_query(ADVISORY_UNLOCK_SQL)
        .bind::<Text, _>(key.as_str())
        .get_result::<UnlockRow>(connection);
    match outcome {
        Ok(row) if row.released => Ok(()),
        Ok(_) => {
            warn!(%key, "advisory lock was not held by its session");
            Ok(())
        }
        Err(err) => {
            // The connection goes back to the pool, so it must not keep
            // any advisory lock.
            if let Err(cleanup) = diesel::sql_query(ADVISORY_UNLOCK_ALL_SQL).execute(connection) {
                warn!(%key, error = %cleanup, "advisory unlock fallback failed");
            }
            Err(LockError::unavailable(err))
        }
    }
}

fn map_lock_error(err: DieselError, key: &LockKey, wait_timeout: Option<Duration>) -> LockError {
    match (&err, wait_timeout) {
        (DieselError::DatabaseError(_, info), Some(waited))
            if info.message().contains("lock timeout") =>
        {
            LockError::Timeout {
                key: key.clone(),
                waited,
            }
        }
        _ => LockError::unavailable(err),
    }
}

#[async_trait]
impl LockManager for PostgresLockManager {
    async fn acquire(&self, key: &LockKey, owner: LockOwner) -> LockResult<LockHandle> {
        if let Some(handle) = self.reenter(key, owner) {
            return Ok(handle);
        }

        let (permit, budget) = self.admit(key).await?;
        let (sender, receiver) = oneshot::channel();
        let pool = self.pool.clone();
        let lock_key = key.clone();
        let wait_timeout = self.settings.wait_timeout;
        tokio::task::spawn_blocking(move || {
            let outcome = lock_session(&pool, &lock_key, budget, wait_timeout)
                .map(|connection| (connection, permit));
            // Caller went away while waiting; give the lock straight back.
            if let Err(Ok((mut connection, _permit))) = sender.send(outcome)
                && let Err(err) = unlock_session(&mut connection, &lock_key)
            {
                warn!(key = %lock_key, error = %err, "failed to unlock abandoned advisory lock");
            }
        });

        let (connection, permit) = receiver.await.map_err(|_| {
            LockError::unavailable(io::Error::other("advisory lock task ended without a result"))
        })??;

        self.sessions().insert(
            key.clone(),
            Session {
                owner,
                holds: 1,
                connection,
                permit,
            },
        );
        Ok(LockHandle::new(key.clone(), owner))
    }

    async fn release(&self, handle: LockHandle) -> LockResult<()> {
        let not_held = || LockError::NotHeld {
            key: handle.key().clone(),
            owner: handle.owner(),
        };

        let Session {
            mut connection,
            permit,
            ..
        } = {
            let mut sessions = self.sessions();
            let session = sessions
                .get_mut(handle.key())
                .filter(|s| s.owner == handle.owner() && s.holds > 0)
                .ok_or_else(not_held)?;
            session.holds -= 1;
            if session.holds > 0 {
                return Ok(());
            }
            sessions.remove(handle.key()).ok_or_else(not_held)?
        };

        let key = handle.key().clone();
        tokio::task::spawn_blocking(move || {
            let released = unlock_session(&mut connection, &key);
            drop(connection);
            drop(permit);
            released
        })
        .await
        .map_err(LockError::unavailable)?
    }

    fn hold_count(&self, handle: &LockHandle) -> u32 {
        self.sessions()
            .get(handle.key())
            .filter(|s| s.owner == handle.owner())
            .map_or(0, |s| s.holds)
    }
}
