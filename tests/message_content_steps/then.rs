//! Then steps for message content BDD scenarios.

use super::world::{ContentWorld, message_id, run_async};
use papertrail::content::ports::{
    ContentRepositoryError, ContentServiceError, MessageContentOperations,
    MessageContentRepository,
};
use rstest_bdd_macros::then;

fn is_not_found(err: &ContentServiceError) -> bool {
    matches!(
        err,
        ContentServiceError::Repository(ContentRepositoryError::NotFound(_))
    )
}

#[then(r#"viewing message {id:i64} returns "{text}""#)]
fn view_returns(world: &mut ContentWorld, id: i64, text: String) -> Result<(), eyre::Report> {
    let record = run_async(world.service.view(message_id(id)?))
        .map_err(|err| eyre::eyre!("view failed: {err}"))?;
    if record.content().as_str() != text {
        return Err(eyre::eyre!(
            "expected '{text}', found '{}'",
            record.content().as_str()
        ));
    }
    Ok(())
}

#[then("viewing message {id:i64} fails with not found")]
fn view_not_found(world: &mut ContentWorld, id: i64) -> Result<(), eyre::Report> {
    match run_async(world.service.view(message_id(id)?)) {
        Err(err) if is_not_found(&err) => Ok(()),
        other => Err(eyre::eyre!("expected not found, got {other:?}")),
    }
}

#[then("the last operation fails with not found")]
fn last_not_found(world: &ContentWorld) -> Result<(), eyre::Report> {
    match &world.last_error {
        Some(err) if is_not_found(err) => Ok(()),
        other => Err(eyre::eyre!("expected not found, got {other:?}")),
    }
}

#[then("the last operation fails with a duplicate message error")]
fn last_duplicate(world: &ContentWorld) -> Result<(), eyre::Report> {
    if !matches!(
        world.last_error,
        Some(ContentServiceError::Repository(
            ContentRepositoryError::DuplicateMessage(_)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected duplicate message error, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}

#[then("the sweep removed {count:u64} message")]
fn sweep_removed(world: &ContentWorld, count: u64) -> Result<(), eyre::Report> {
    if world.last_swept != Some(count) {
        return Err(eyre::eyre!(
            "expected {count} removed, got {:?}",
            world.last_swept
        ));
    }
    Ok(())
}

#[then("message {id:i64} is no longer archived")]
fn no_longer_archived(world: &ContentWorld, id: i64) -> Result<(), eyre::Report> {
    let present = run_async(world.repository.exists(message_id(id)?))
        .map_err(|err| eyre::eyre!("exists failed: {err}"))?;
    if present {
        return Err(eyre::eyre!("message {id} should have been swept"));
    }
    Ok(())
}

#[then("message {id:i64} is still archived")]
fn still_archived(world: &ContentWorld, id: i64) -> Result<(), eyre::Report> {
    let present = run_async(world.repository.exists(message_id(id)?))
        .map_err(|err| eyre::eyre!("exists failed: {err}"))?;
    if !present {
        return Err(eyre::eyre!("message {id} should have been kept"));
    }
    Ok(())
}
