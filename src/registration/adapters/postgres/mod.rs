//! `PostgreSQL` adapters for guild registration persistence.

mod models;
mod queries;
mod repository;
mod schema;

pub use repository::{PostgresGuildRegistry, RegistrationPgPool};
