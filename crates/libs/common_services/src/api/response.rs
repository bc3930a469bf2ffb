use serde::Serialize;
use utoipa::ToSchema;

/// Message returned for every unexpected failure, whatever the cause.
pub const SERVER_ERROR_MESSAGE: &str = "Sorry, something went wrong on our server.";

#[derive(Serialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request was handled.
    Success,
    /// The client sent something that cannot be handled.
    Fail,
    /// The server failed.
    Error,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn server_error() -> Self {
        Self {
            status: ResponseStatus::Error,
            message: SERVER_ERROR_MESSAGE.to_owned(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct DataResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }
}
