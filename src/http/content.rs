//! Message content endpoints.

use super::dto::MessageContentDto;
use super::error::ApiError;
use super::path_id;
use crate::content::domain::MessageId;
use crate::content::ports::{ContentServiceError, MessageContentOperations};
use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared handle to the content operations, locked or not.
pub type ContentState = Arc<dyn MessageContentOperations>;

/// Content routes, relative to their mount point.
#[must_use]
pub fn routes(service: ContentState) -> Router {
    Router::new()
        .route("/", post(save).put(update))
        .route("/:message_id", get(view).delete(delete))
        .with_state(service)
}

fn validation(err: crate::content::domain::ContentDomainError, path: &str) -> ApiError {
    ApiError::from_error(&ContentServiceError::from(err), path)
}

fn parse_body(
    payload: Result<Json<MessageContentDto>, JsonRejection>,
    path: &str,
) -> Result<MessageContentDto, ApiError> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| ApiError::malformed_body(&rejection, path))
}

fn parse_message_id(raw: &str, path: &str) -> Result<MessageId, ApiError> {
    MessageId::new(path_id(raw, path)?).map_err(|err| validation(err, path))
}

/// `POST /`: archives a message.
///
/// # Errors
///
/// Returns 409 when the message is already archived, 400 for invalid input,
/// 503 when the message lock is unavailable.
pub async fn save(
    State(service): State<ContentState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<MessageContentDto>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageContentDto>), ApiError> {
    let path = uri.path();
    let content = parse_body(payload, path)?
        .into_new()
        .map_err(|err| validation(err, path))?;
    let record = service
        .save(content)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// `GET /:message_id`: returns an archived message.
///
/// # Errors
///
/// Returns 404 when nothing is archived for the message.
pub async fn view(
    State(service): State<ContentState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageContentDto>, ApiError> {
    let path = uri.path();
    let message_id = parse_message_id(&raw_id, path)?;
    let record = service
        .view(message_id)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(Json(record.into()))
}

/// `PUT /`: overwrites an archived message's body and author.
///
/// # Errors
///
/// Returns 404 when nothing is archived for the message.
pub async fn update(
    State(service): State<ContentState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<MessageContentDto>, JsonRejection>,
) -> Result<Json<MessageContentDto>, ApiError> {
    let path = uri.path();
    let (message_id, changes) = parse_body(payload, path)?
        .into_update()
        .map_err(|err| validation(err, path))?;
    let record = service
        .update(message_id, changes)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(Json(record.into()))
}

/// `DELETE /:message_id`: removes an archived message.
///
/// # Errors
///
/// Returns 404 when nothing is archived for the message.
pub async fn delete(
    State(service): State<ContentState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let path = uri.path();
    let message_id = parse_message_id(&raw_id, path)?;
    service
        .delete(message_id)
        .await
        .map_err(|err| ApiError::from_error(&err, path))?;
    Ok(StatusCode::NO_CONTENT)
}
