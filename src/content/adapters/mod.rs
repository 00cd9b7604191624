//! Persistence adapters for the content module.
//!
//! - [`memory::InMemoryMessageContentRepository`]: thread-safe in-memory
//!   storage for tests and database-less runs
//! - [`postgres::PostgresMessageContentRepository`]: `PostgreSQL`
//!   persistence using Diesel

pub mod memory;
pub mod postgres;
