//! Per-key mutual exclusion.
//!
//! A [`LockManager`] grants exclusive access to a string key. Managers are
//! fair (queued waiters are served in arrival order) and re-entrant (an
//! owner already holding a key may acquire it again, and must release it the
//! same number of times). Hold counts are exposed for diagnostics.
//!
//! Two adapters are provided:
//!
//! - [`adapters::LocalLockManager`]: in-process queue, for single-node
//!   deployments and tests
//! - [`adapters::PostgresLockManager`]: `PostgreSQL` session advisory
//!   locks, shared by every process using the same database

pub mod adapters;
mod error;
mod guard;
mod types;

pub use error::{LockError, LockResult};
pub use guard::HeldLock;
pub use types::{LockHandle, LockKey, LockOwner, LockSettings};

use async_trait::async_trait;

/// Fair, re-entrant, per-key lock contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockManager: Send + Sync {
    /// Waits until `owner` holds `key`.
    ///
    /// Returns immediately with an incremented hold count when `owner`
    /// already holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Timeout`] when the configured wait limit elapses
    /// or [`LockError::Unavailable`] when the coordination backend cannot be
    /// reached.
    async fn acquire(&self, key: &LockKey, owner: LockOwner) -> LockResult<LockHandle>;

    /// Releases one hold. The key is handed to the next waiter once the hold
    /// count reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::NotHeld`] when the handle's owner does not hold
    /// the key, or [`LockError::Unavailable`] when the backend fails.
    async fn release(&self, handle: LockHandle) -> LockResult<()>;

    /// Returns how many times the handle's owner currently holds its key.
    fn hold_count(&self, handle: &LockHandle) -> u32;
}
