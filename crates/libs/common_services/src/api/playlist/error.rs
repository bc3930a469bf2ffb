use crate::api::response::MessageResponse;
use crate::database::DbError;
use crate::message_channel::ChannelError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Everything that can go wrong while acting on a playlist.
///
/// `Validation`, `NotFound`, `Forbidden` and `Conflict` are client errors and reach the caller with
/// their message. Everything else is answered with one fixed server error message.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Message channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

impl PlaylistError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Channel(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

fn log_error(error: &PlaylistError) {
    match error {
        PlaylistError::Validation(message) => warn!("Playlist -> Validation failed: {}", message),
        PlaylistError::NotFound(message) => warn!("Playlist -> Not found: {}", message),
        PlaylistError::Forbidden(message) => warn!("Playlist -> Forbidden: {}", message),
        PlaylistError::Conflict(message) => warn!("Playlist -> Conflict: {}", message),
        PlaylistError::Channel(e) => error!("Message channel failed: {}", e),
        PlaylistError::Database(e) => error!("Database query failed: {}", e),
        PlaylistError::Internal(e) => error!("Internal error: {:?}", e),
    }
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        log_error(&self);

        let status = self.status_code();
        let body = match self {
            Self::Validation(message)
            | Self::NotFound(message)
            | Self::Forbidden(message)
            | Self::Conflict(message) => MessageResponse::fail(message),
            Self::Channel(_) | Self::Database(_) | Self::Internal(_) => {
                MessageResponse::server_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for PlaylistError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid ({})", e.code), ToString::to_string)
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join(", "))
    }
}

impl From<JsonRejection> for PlaylistError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<serde_json::Error> for PlaylistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}
