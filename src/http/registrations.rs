//! Registration endpoints, mounted once per namespace.

use super::dto::RegistrationDto;
use super::error::ApiError;
use super::path_id;
use crate::registration::domain::GuildId;
use crate::registration::services::{GuildRegistrationOperations, RegistrationServiceError};
use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared handle to one namespace's operations.
pub type RegistrationState = Arc<dyn GuildRegistrationOperations>;

/// Routes for one registration namespace, relative to its mount point.
#[must_use]
pub fn routes(service: RegistrationState) -> Router {
    Router::new()
        .route("/", post(register).put(update))
        .route("/:guild_id", get(view).delete(delete))
        .with_state(service)
}

fn parse_guild_id(raw: &str, path: &str) -> Result<GuildId, ApiError> {
    GuildId::new(path_id(raw, path)?)
        .map_err(|err| ApiError::from_error(&RegistrationServiceError::from(err), path))
}

fn parse_body(
    payload: Result<Json<RegistrationDto>, JsonRejection>,
    path: &str,
) -> Result<RegistrationDto, ApiError> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| ApiError::malformed_body(&rejection, path))
}

/// `POST /`: registers a guild's log channel.
///
/// # Errors
///
/// Returns 409 when the guild or channel is taken, 400 for invalid input.
pub async fn register(
    State(service): State<RegistrationState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<RegistrationDto>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationDto>), ApiError> {
    let path = uri.path();
    let registration = parse_body(payload, path)?
        .into_domain()
        .map_err(|err| ApiError::from_error(&RegistrationServiceError::from(err), path))?;
    let stored = service
        .register(registration)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// `GET /:guild_id`: returns a guild's registration.
///
/// # Errors
///
/// Returns 404 when the guild is not registered.
pub async fn view(
    State(service): State<RegistrationState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
) -> Result<Json<RegistrationDto>, ApiError> {
    let path = uri.path();
    let guild_id = parse_guild_id(&raw_id, path)?;
    let registration = service
        .view(guild_id)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(Json(registration.into()))
}

/// `PUT /`: points a guild's registration at a new channel.
///
/// # Errors
///
/// Returns 404 when the guild is not registered, 409 when the channel is
/// taken.
pub async fn update(
    State(service): State<RegistrationState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<RegistrationDto>, JsonRejection>,
) -> Result<Json<RegistrationDto>, ApiError> {
    let path = uri.path();
    let requested = parse_body(payload, path)?
        .into_domain()
        .map_err(|err| ApiError::from_error(&RegistrationServiceError::from(err), path))?;
    let updated = service
        .update(requested.guild_id(), requested.channel_id())
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(Json(updated.into()))
}

/// `DELETE /:guild_id`: removes a guild's registration.
///
/// # Errors
///
/// Returns 404 when the guild is not registered.
pub async fn delete(
    State(service): State<RegistrationState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let path = uri.path();
    let guild_id = parse_guild_id(&raw_id, path)?;
    service
        .delete(guild_id)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(StatusCode::NO_CONTENT)
}
