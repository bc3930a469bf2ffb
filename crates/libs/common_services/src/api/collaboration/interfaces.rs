use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Identifies a collaboration grant: which user on which playlist.
#[derive(Serialize, Deserialize, Validate, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollaborationRequest {
    #[validate(length(min = 1, message = "playlistId is required"))]
    pub playlist_id: String,
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationCreatedData {
    pub collaboration_id: String,
}
