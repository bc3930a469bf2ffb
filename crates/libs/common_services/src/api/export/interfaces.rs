use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Response message of an accepted export request.
pub const EXPORT_QUEUED_MESSAGE: &str = "request queued";

#[derive(Serialize, Deserialize, Validate, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExportPlaylistRequest {
    /// Address the exported playlist is mailed to.
    #[validate(
        required(message = "targetEmail is required"),
        email(message = "targetEmail must be a valid email address")
    )]
    #[schema(value_type = String, format = "email", example = "listener@example.com")]
    pub target_email: Option<String>,
}

/// The message handed to the export worker.
///
/// The field names and their order are the wire contract with the worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlaylistJob {
    pub user_id: String,
    pub playlist_id: String,
    pub target_email: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExportStatus {
    /// The request was accepted. It does not guarantee the worker will receive the job.
    Queued,
}
