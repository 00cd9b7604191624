//! In-memory adapters for guild registration persistence.

mod registry;

pub use registry::InMemoryGuildRegistry;
