//! Port contracts for guild registration persistence.

pub mod repository;

pub use repository::{
    GuildRegistrationRepository, RegistrationRepositoryError, RegistrationRepositoryResult,
};
