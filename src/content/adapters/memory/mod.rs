//! In-memory adapters for message content persistence.

mod repository;

pub use repository::InMemoryMessageContentRepository;
