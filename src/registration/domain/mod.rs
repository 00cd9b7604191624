//! Domain model for guild log-channel registrations.
//!
//! A registration maps a guild to the channel that receives one stream of
//! logs. The two streams ([`RegistrationKind`]) share this model but live in
//! separate namespaces.

mod error;
mod ids;
mod kind;
mod registration;

pub use error::{ParseRegistrationKindError, RegistrationDomainError};
pub use ids::{ChannelId, GuildId};
pub use kind::RegistrationKind;
pub use registration::GuildRegistration;
