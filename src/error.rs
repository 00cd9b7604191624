//! Crate-wide error classification.
//!
//! Each layer keeps its own `thiserror` enum. The boundary layer only needs
//! to know which class a failure belongs to, so every error type exposes an
//! [`ErrorKind`] through [`Classify`].

use std::fmt;

/// Client-facing class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Create attempted on an existing key, or a uniqueness constraint fired.
    AlreadyExists,
    /// Read, update, or delete attempted on a missing key.
    NotFound,
    /// The coordination primitive could not be reached or acquired in time.
    LockUnavailable,
    /// A store constraint other than uniqueness rejected the write.
    ConstraintViolation,
    /// Input failed domain validation.
    Validation,
    /// Anything else from the store or cache collaborator.
    Internal,
}

impl ErrorKind {
    /// Returns a stable, machine-readable name for the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::LockUnavailable => "lock_unavailable",
            Self::ConstraintViolation => "constraint_violation",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an error onto the shared [`ErrorKind`] taxonomy.
pub trait Classify {
    /// Returns the class of this error.
    fn kind(&self) -> ErrorKind;
}
