//! Given steps for guild registration BDD scenarios.

use super::world::{RegistrationWorld, guild_id, registration, run_async};
use eyre::WrapErr;
use papertrail::registration::services::GuildRegistrationOperations;
use rstest_bdd_macros::given;

#[given("an empty audit-log registry")]
fn empty_registry(world: &mut RegistrationWorld) -> Result<(), eyre::Report> {
    if run_async(world.service.view(guild_id(5)?)).is_ok() {
        return Err(eyre::eyre!("expected an empty registry"));
    }
    Ok(())
}

#[given("guild {guild:i64} has registered channel {channel:i64}")]
fn guild_has_registered(
    world: &mut RegistrationWorld,
    guild: i64,
    channel: i64,
) -> Result<(), eyre::Report> {
    run_async(world.service.register(registration(guild, channel)?))
        .wrap_err("register guild for scenario")?;
    Ok(())
}
