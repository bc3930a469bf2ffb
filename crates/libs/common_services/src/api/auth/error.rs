use crate::api::response::MessageResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use tracing::{error, warn};

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    UserNotFound,
    Internal(eyre::Report),
}

fn log_auth_failure(error: &AuthError) {
    match error {
        AuthError::MissingToken => warn!("Authentication failed: Missing Authorization token."),
        AuthError::InvalidToken => warn!("Authentication failed: Invalid token provided."),
        AuthError::UserNotFound => warn!("Authentication failed: User from token not found."),
        AuthError::Internal(e) => {
            error!("Internal server error during authentication: {:?}", e);
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_auth_failure(&self);

        let (status, body) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                MessageResponse::fail("Missing authentication"),
            ),
            Self::InvalidToken | Self::UserNotFound => (
                StatusCode::UNAUTHORIZED,
                MessageResponse::fail("Authentication failed"),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                MessageResponse::server_error(),
            ),
        };

        (status, Json(body)).into_response()
    }
}

// This allows us to use `?` to convert store and other errors into `AuthError::Internal`.
impl<E> From<E> for AuthError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
