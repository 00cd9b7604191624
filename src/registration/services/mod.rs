//! Application services for guild registrations.

mod registration;

pub use registration::{
    GuildRegistrationOperations, GuildRegistrationService, RegistrationServiceError,
    RegistrationServiceResult,
};
