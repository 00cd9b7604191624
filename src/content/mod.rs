//! Archived message content.
//!
//! Message bodies are archived when sent and kept for thirty days so that
//! edits and deletions can later be logged alongside the original text.
//! Every operation on one message runs under that message's lock when
//! locking is enabled, and a background sweeper removes expired records.
//!
//! The module follows the same hexagonal layout as registrations:
//!
//! - [`domain`]: identifiers, bounded text, and the record aggregate
//! - [`ports`]: repository and operation contracts
//! - [`adapters`]: in-memory and `PostgreSQL` repositories
//! - [`services`]: the content service, its locking wrapper, and the
//!   retention sweeper

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
