//! When steps for message content BDD scenarios.

use std::sync::Arc;

use super::world::{ContentWorld, message_id, payload, run_async};
use mockable::DefaultClock;
use papertrail::content::{
    domain::{MessageContentUpdate, MessageText},
    ports::MessageContentOperations,
    services::RetentionSweeper,
};
use rstest_bdd_macros::when;

#[when(r#"message {id:i64} is archived with text "{text}" by author {author:i64}"#)]
fn archive_message(
    world: &mut ContentWorld,
    id: i64,
    text: String,
    author: i64,
) -> Result<(), eyre::Report> {
    let content = payload(id, text, author)?;
    let result = run_async(world.service.save(content));
    world.record(result);
    Ok(())
}

#[when(r#"message {id:i64} is edited to "{text}""#)]
fn edit_message(world: &mut ContentWorld, id: i64, text: String) -> Result<(), eyre::Report> {
    let update = MessageContentUpdate::new()
        .with_content(MessageText::new(text).map_err(|err| eyre::eyre!("invalid text: {err}"))?);
    let result = run_async(world.service.update(message_id(id)?, update));
    world.record(result);
    Ok(())
}

#[when("message {id:i64} is deleted")]
fn delete_message(world: &mut ContentWorld, id: i64) -> Result<(), eyre::Report> {
    let result = run_async(world.service.delete(message_id(id)?));
    world.record(result);
    Ok(())
}

#[when("the retention sweep runs")]
fn run_sweep(world: &mut ContentWorld) -> Result<(), eyre::Report> {
    let sweeper = RetentionSweeper::new(
        Arc::clone(&world.repository),
        Arc::clone(&world.cache),
        Arc::new(DefaultClock),
    );
    let removed =
        run_async(sweeper.sweep()).map_err(|err| eyre::eyre!("sweep failed: {err}"))?;
    world.last_swept = Some(removed);
    Ok(())
}
