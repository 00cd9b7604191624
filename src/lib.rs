//! Papertrail: guild log registration and message archival backend.
//!
//! Guilds register a channel to receive audit logs or message logs, and
//! individual messages are archived with their content, author, and creation
//! time so that later edits and deletions can be reported.
//!
//! # Architecture
//!
//! Papertrail follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, cache, locks)
//!
//! # Modules
//!
//! - [`registration`]: Guild audit-log and message-log channel registrations
//! - [`content`]: Archived message content, per-message locking, retention
//! - [`cache`]: Read-through record cache keyed by bare record ids
//! - [`lock`]: Fair, re-entrant per-key mutual exclusion
//! - [`http`]: JSON boundary mapping service errors to status codes
//! - [`config`]: TOML and environment configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod lock;
pub mod registration;
pub mod telemetry;
