//! `PostgreSQL` adapters for message content persistence.

mod models;
mod repository;
mod schema;

pub use repository::{ContentPgPool, PostgresMessageContentRepository};
