//! Lock keys, owners, and handles.

use crate::content::domain::MessageId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Name of a lockable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockKey(String);

impl LockKey {
    /// Creates a key from any string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Message content is locked under the decimal form of its id.
impl From<MessageId> for LockKey {
    fn from(id: MessageId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity that holds a lock; re-entrancy is scoped to one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockOwner(Uuid);

impl LockOwner {
    /// Creates a new random owner.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LockOwner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LockOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof of one hold on a key. Consumed by release.
#[derive(Debug, PartialEq, Eq)]
pub struct LockHandle {
    key: LockKey,
    owner: LockOwner,
}

impl LockHandle {
    /// Creates a handle. Managers call this once a hold is granted.
    #[must_use]
    pub const fn new(key: LockKey, owner: LockOwner) -> Self {
        Self { key, owner }
    }

    /// Returns the locked key.
    #[must_use]
    pub const fn key(&self) -> &LockKey {
        &self.key
    }

    /// Returns the holding owner.
    #[must_use]
    pub const fn owner(&self) -> LockOwner {
        self.owner
    }
}

/// Tuning shared by lock manager adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockSettings {
    /// Longest time a caller waits for a key. `None` waits indefinitely.
    pub wait_timeout: Option<Duration>,
}

impl LockSettings {
    /// Settings with an unbounded wait.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { wait_timeout: None }
    }

    /// Settings that give up after `limit`.
    #[must_use]
    pub const fn with_wait_timeout(limit: Duration) -> Self {
        Self {
            wait_timeout: Some(limit),
        }
    }
}
