//! Registration namespaces.

use super::ParseRegistrationKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Log stream a guild registers a channel for.
///
/// Audit logging and message logging are opted into independently, so each
/// kind is a separate namespace: the same guild may appear in both, and
/// channel uniqueness is enforced per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    /// Guild audit-log events.
    AuditLog,
    /// Guild message edit and delete events.
    MessageLog,
}

impl RegistrationKind {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuditLog => "audit_log",
            Self::MessageLog => "message_log",
        }
    }

    /// Returns the cache region name for registrations of this kind.
    #[must_use]
    pub const fn cache_region(self) -> &'static str {
        match self {
            Self::AuditLog => "auditLog",
            Self::MessageLog => "messageLog",
        }
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RegistrationKind {
    type Error = ParseRegistrationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "audit_log" | "audit" => Ok(Self::AuditLog),
            "message_log" | "message" => Ok(Self::MessageLog),
            _ => Err(ParseRegistrationKindError(value.to_owned())),
        }
    }
}
