//! When steps for guild registration BDD scenarios.

use super::world::{RegistrationWorld, channel_id, guild_id, registration, run_async};
use papertrail::registration::services::GuildRegistrationOperations;
use rstest_bdd_macros::when;

#[when("guild {guild:i64} registers channel {channel:i64}")]
fn register_guild(
    world: &mut RegistrationWorld,
    guild: i64,
    channel: i64,
) -> Result<(), eyre::Report> {
    world.last_error = run_async(world.service.register(registration(guild, channel)?)).err();
    Ok(())
}

#[when("guild {guild:i64} moves to channel {channel:i64}")]
fn move_guild(world: &mut RegistrationWorld, guild: i64, channel: i64) -> Result<(), eyre::Report> {
    run_async(world.service.update(guild_id(guild)?, channel_id(channel)?))
        .map_err(|err| eyre::eyre!("update failed: {err}"))?;
    Ok(())
}

#[when("guild {guild:i64} is removed")]
fn remove_guild(world: &mut RegistrationWorld, guild: i64) -> Result<(), eyre::Report> {
    run_async(world.service.delete(guild_id(guild)?))
        .map_err(|err| eyre::eyre!("delete failed: {err}"))?;
    Ok(())
}
