use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Error returned by the `/api` handlers. Rendered as
/// `{"success": false, "error": "<message>"}`.
#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "News article not found".to_string())
                    }
                    EntityErrorKind::Invalid => {
                        (StatusCode::BAD_REQUEST, "Invalid action".to_string())
                    }
                    EntityErrorKind::Other(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to update news".to_string(),
                    ),
                },
                InternalErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update news".to_string(),
                ),
            },
            // The API reports a single message; the first failing field wins.
            DomainErrorKind::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                field_errors
                    .messages()
                    .next()
                    .unwrap_or("Invalid request")
                    .to_string(),
            ),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("API request failed: {}", self.0);
        } else {
            warn!("API request rejected ({status}): {message}");
        }

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Error returned by the page handlers under `/news`. A missing article is a
/// plain-text 404; form problems are reported per field as
/// `{"errors": {...}}` so the form can show them next to each input.
#[derive(Debug)]
pub struct PageError(DomainError);

impl StdError for PageError {}

impl std::fmt::Display for PageError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                (StatusCode::NOT_FOUND, "News article not found").into_response()
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)) => {
                (StatusCode::BAD_REQUEST, "Bad Request").into_response()
            }
            DomainErrorKind::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": field_errors })),
            )
                .into_response(),
            DomainErrorKind::Internal(internal_error_kind) => {
                error!("Page request failed: {internal_error_kind:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": { "general": "Failed to create news article" } })),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for PageError
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
