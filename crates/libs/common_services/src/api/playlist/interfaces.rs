use crate::database::playlist::{PlaylistSummary, PlaylistWithSongs};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// --- Request Payloads ---

#[derive(Serialize, Deserialize, Validate, ToSchema, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePlaylistRequest {
    #[validate(
        length(min = 1, max = 255, message = "name must be between 1 and 255 characters"),
        custom(function = "not_blank", message = "name must not be blank")
    )]
    pub name: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Validate, ToSchema, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlaylistSongRequest {
    #[validate(length(min = 1, message = "songId is required"))]
    pub song_id: String,
}

// --- Response Payloads ---

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistCreatedData {
    pub playlist_id: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistsData {
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongsData {
    pub playlist: PlaylistWithSongs,
}
