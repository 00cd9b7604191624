//! Mapping of failures onto HTTP responses.

use crate::error::{Classify, ErrorKind};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, error};

/// Body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Failure class.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
    /// When the failure was reported.
    pub timestamp: DateTime<Utc>,
    /// Request path.
    pub path: String,
}

/// Returns the status code for a failure class.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::LockUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ConstraintViolation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A failed request, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    path: String,
}

impl ApiError {
    /// Builds a response for any classified error.
    #[must_use]
    pub fn from_error<E>(err: &E, path: impl Into<String>) -> Self
    where
        E: Classify + Display + ?Sized,
    {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            path: path.into(),
        }
    }

    /// Builds a 400 response for a body that is not valid JSON for the
    /// expected payload.
    #[must_use]
    pub fn malformed_body(rejection: &JsonRejection, path: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: rejection.body_text(),
            path: path.into(),
        }
    }

    /// Builds a 404 response for a path segment that is not an id.
    #[must_use]
    pub fn unknown_resource(path: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: "no resource at this path".to_owned(),
            path: path.into(),
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the status code that will be sent.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        status_for(self.kind)
    }

    /// Returns the response body.
    #[must_use]
    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status().as_u16(),
            error: self.kind.as_str().to_owned(),
            message: self.message.clone(),
            timestamp: Utc::now(),
            path: self.path.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = %self.kind, path = %self.path, message = %self.message, "request failed");
        } else {
            debug!(kind = %self.kind, path = %self.path, message = %self.message, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
