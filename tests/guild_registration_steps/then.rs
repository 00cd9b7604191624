//! Then steps for guild registration BDD scenarios.

use super::world::{RegistrationWorld, guild_id, run_async};
use papertrail::registration::{
    ports::RegistrationRepositoryError,
    services::{GuildRegistrationOperations, RegistrationServiceError},
};
use rstest_bdd_macros::then;

#[then("guild {guild:i64} is registered to channel {channel:i64}")]
fn registered_to(world: &RegistrationWorld, guild: i64, channel: i64) -> Result<(), eyre::Report> {
    let found = run_async(world.service.view(guild_id(guild)?))
        .map_err(|err| eyre::eyre!("view failed: {err}"))?;
    if found.channel_id().value() != channel {
        return Err(eyre::eyre!(
            "expected channel {channel}, found {}",
            found.channel_id().value()
        ));
    }
    Ok(())
}

#[then("guild {guild:i64} is not registered")]
fn not_registered(world: &RegistrationWorld, guild: i64) -> Result<(), eyre::Report> {
    match run_async(world.service.view(guild_id(guild)?)) {
        Err(RegistrationServiceError::Repository(RegistrationRepositoryError::NotFound(_))) => {
            Ok(())
        }
        other => Err(eyre::eyre!("expected not found, got {other:?}")),
    }
}

#[then("the last registration fails with a duplicate channel error")]
fn duplicate_channel(world: &RegistrationWorld) -> Result<(), eyre::Report> {
    if !matches!(
        world.last_error,
        Some(RegistrationServiceError::Repository(
            RegistrationRepositoryError::DuplicateChannel(_)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected duplicate channel error, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}
