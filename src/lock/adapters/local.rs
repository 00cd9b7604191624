//! In-process fair lock manager.

use crate::lock::{LockError, LockHandle, LockKey, LockManager, LockOwner, LockResult, LockSettings};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::warn;

type LockTable = HashMap<LockKey, KeyState>;

#[derive(Default)]
struct KeyState {
    owner: Option<LockOwner>,
    holds: u32,
    queue: VecDeque<Waiter>,
}

struct Waiter {
    ticket: u64,
    owner: LockOwner,
    grant: oneshot::Sender<()>,
}

/// Lock manager backed by an in-memory table of per-key FIFO queues.
///
/// Ownership is handed directly from the releasing owner to the oldest
/// waiter, so a newcomer can never overtake a queued caller.
#[derive(Clone)]
pub struct LocalLockManager {
    table: Arc<Mutex<LockTable>>,
    next_ticket: Arc<AtomicU64>,
    settings: LockSettings,
}

impl LocalLockManager {
    /// Creates a manager with the given settings.
    #[must_use]
    pub fn new(settings: LockSettings) -> Self {
        Self {
            table: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(0)),
            settings,
        }
    }

    /// Returns the number of callers queued behind the holder of `key`.
    #[must_use]
    pub fn queued(&self, key: &LockKey) -> usize {
        self.table
            .lock()
            .map(|table| table.get(key).map_or(0, |state| state.queue.len()))
            .unwrap_or(0)
    }

    fn lock_table(&self) -> LockResult<MutexGuard<'_, LockTable>> {
        lock_table(&self.table)
    }
}

impl Default for LocalLockManager {
    fn default() -> Self {
        Self::new(LockSettings::unbounded())
    }
}

fn lock_table(table: &Mutex<LockTable>) -> LockResult<MutexGuard<'_, LockTable>> {
    table
        .lock()
        .map_err(|_| LockError::unavailable(io::Error::other("local lock table poisoned")))
}

/// Drops one hold and, when the count reaches zero, hands the key to the
/// oldest waiter that is still listening.
fn release_hold(table: &mut LockTable, key: &LockKey, owner: LockOwner) -> LockResult<()> {
    let not_held = || LockError::NotHeld {
        key: key.clone(),
        owner,
    };
    let state = table.get_mut(key).ok_or_else(not_held)?;
    if state.owner != Some(owner) || state.holds == 0 {
        return Err(not_held());
    }

    state.holds -= 1;
    if state.holds > 0 {
        return Ok(());
    }

    state.owner = None;
    while let Some(waiter) = state.queue.pop_front() {
        state.owner = Some(waiter.owner);
        state.holds = 1;
        if waiter.grant.send(()).is_ok() {
            return Ok(());
        }
        state.owner = None;
        state.holds = 0;
    }

    table.remove(key);
    Ok(())
}

/// Tracks a queued acquisition so that an abandoned wait leaves no trace.
struct PendingAcquire {
    table: Arc<Mutex<LockTable>>,
    key: LockKey,
    owner: LockOwner,
    ticket: u64,
    settled: bool,
}

impl PendingAcquire {
    /// Resolves an elapsed wait. The grant may have raced the timer, in
    /// which case the hold is kept.
    fn expire(&mut self, waited: Duration) -> LockResult<LockHandle> {
        let mut table = lock_table(&self.table)?;
        self.settled = true;
        if let Some(state) = table.get_mut(&self.key) {
            if state.owner == Some(self.owner) {
                return Ok(LockHandle::new(self.key.clone(), self.owner));
            }
            state.queue.retain(|w| w.ticket != self.ticket);
        }
        Err(LockError::Timeout {
            key: self.key.clone(),
            waited,
        })
    }
}

impl Drop for PendingAcquire {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut table) = self.table.lock() else {
            return;
        };
        let Some(state) = table.get_mut(&self.key) else {
            return;
        };
        let before = state.queue.len();
        state.queue.retain(|w| w.ticket != self.ticket);
        if state.queue.len() == before && state.owner == Some(self.owner) {
            // Granted after the caller stopped listening.
            if let Err(err) = release_hold(&mut table, &self.key, self.owner) {
                warn!(key = %self.key, error = %err, "abandoned lock grant not returned");
            }
        }
    }
}

#[async_trait]
impl LockManager for LocalLockManager {
    async fn acquire(&self, key: &LockKey, owner: LockOwner) -> LockResult<LockHandle> {
        let (ticket, granted) = {
            let mut table = self.lock_table()?;
            let state = table.entry(key.clone()).or_default();
            match state.owner {
                None => {
                    state.owner = Some(owner);
                    state.holds = 1;
                    return Ok(LockHandle::new(key.clone(), owner));
                }
                Some(current) if current == owner => {
                    state.holds = state.holds.saturating_add(1);
                    return Ok(LockHandle::new(key.clone(), owner));
                }
                Some(_) => {
                    let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                    let (grant, granted) = oneshot::channel();
                    state.queue.push_back(Waiter {
                        ticket,
                        owner,
                        grant,
                    });
                    (ticket, granted)
                }
            }
        };

        let mut pending = PendingAcquire {
            table: Arc::clone(&self.table),
            key: key.clone(),
            owner,
            ticket,
            settled: false,
        };

        let outcome = match self.settings.wait_timeout {
            Some(limit) => match tokio::time::timeout(limit, granted).await {
                Ok(outcome) => outcome,
                Err(_) => return pending.expire(limit),
            },
            None => granted.await,
        };

        pending.settled = true;
        outcome.map_err(|_| {
            LockError::unavailable(io::Error::other("lock grant channel closed"))
        })?;
        Ok(LockHandle::new(key.clone(), owner))
    }

    async fn release(&self, handle: LockHandle) -> LockResult<()> {
        let mut table = self.lock_table()?;
        release_hold(&mut table, handle.key(), handle.owner())
    }

    fn hold_count(&self, handle: &LockHandle) -> u32 {
        self.table
            .lock()
            .ok()
            .and_then(|table| {
                table
                    .get(handle.key())
                    .filter(|state| state.owner == Some(handle.owner()))
                    .map(|state| state.holds)
            })
            .unwrap_or(0)
    }
}
