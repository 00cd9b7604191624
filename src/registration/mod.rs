//! Guild log-channel registrations.
//!
//! Guilds opt into audit logging and message logging independently by
//! registering one channel per stream. Registrations are low-volume, so they
//! rely on the store's single-statement atomicity and its channel uniqueness
//! constraint rather than application-level locking. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
