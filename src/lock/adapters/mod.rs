//! Lock manager implementations.

mod local;
mod postgres;

pub use local::LocalLockManager;
pub use postgres::{LockPgPool, PostgresLockManager};
