//! JSON HTTP boundary.
//!
//! Mounts the two registration namespaces and the content endpoints, maps
//! every failure to a status code through [`crate::error::ErrorKind`], and
//! writes one access log line per request.

pub mod content;
pub mod dto;
pub mod error;
pub mod registrations;

pub use error::{ApiError, ErrorResponse, status_for};

use crate::content::ports::MessageContentOperations;
use crate::registration::services::GuildRegistrationOperations;
use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Mount point of audit-log registrations.
pub const AUDIT_LOG_PATH: &str = "/api/v1/log/audit";
/// Mount point of message-log registrations.
pub const MESSAGE_LOG_PATH: &str = "/api/v1/log/message";
/// Mount point of archived message content.
pub const MESSAGE_CONTENT_PATH: &str = "/api/v1/content/message";

/// Services reachable from request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Audit-log registration operations.
    pub audit_log: Arc<dyn GuildRegistrationOperations>,
    /// Message-log registration operations.
    pub message_log: Arc<dyn GuildRegistrationOperations>,
    /// Message content operations, locked or passthrough.
    pub content: Arc<dyn MessageContentOperations>,
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(AUDIT_LOG_PATH, registrations::routes(state.audit_log))
        .nest(MESSAGE_LOG_PATH, registrations::routes(state.message_log))
        .nest(MESSAGE_CONTENT_PATH, content::routes(state.content))
        .layer(middleware::from_fn(access_log))
}

/// Logs method, path, status, and latency of every request.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(%method, %path, status = response.status().as_u16(), elapsed_ms, "request handled");
    response
}

/// Parses a numeric path segment; anything else is an unknown resource.
pub(crate) fn path_id(raw: &str, path: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::unknown_resource(path))
}
