//! Lock acquisition and release errors.

use super::{LockKey, LockOwner};
use crate::error::{Classify, ErrorKind};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors returned by lock managers.
#[derive(Debug, Clone, Error)]
pub enum LockError {
    /// The wait limit elapsed before the key was granted.
    #[error("timed out after {waited:?} waiting for lock '{key}'")]
    Timeout {
        /// The contended key.
        key: LockKey,
        /// How long the caller waited.
        waited: Duration,
    },

    /// The coordination backend could not be reached or failed.
    #[error("lock backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Release was attempted by an owner that does not hold the key.
    #[error("lock '{key}' is not held by {owner}")]
    NotHeld {
        /// The key named by the handle.
        key: LockKey,
        /// The owner named by the handle.
        owner: LockOwner,
    },
}

impl LockError {
    /// Wraps a backend failure.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

impl Classify for LockError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } | Self::Unavailable(_) => ErrorKind::LockUnavailable,
            Self::NotHeld { .. } => ErrorKind::Internal,
        }
    }
}
