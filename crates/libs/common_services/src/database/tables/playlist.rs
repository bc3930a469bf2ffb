use crate::database::song::SongSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::fmt::Display;
use utoipa::ToSchema;

/// Represents a single playlist in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A playlist as listed for a user, with the owner's username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// A playlist with its songs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistWithSongs {
    pub id: String,
    pub name: String,
    pub username: String,
    pub songs: Vec<SongSummary>,
}

/// The role a user has on a specific playlist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaylistRole {
    Owner,
    Collaborator,
    None,
}

/// What a caller needs in order to perform an action on a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Mutating metadata, deleting the playlist, managing collaborators.
    OwnerOnly,
    /// Reading contents, adding/removing songs, requesting an export.
    OwnerOrCollaborator,
}

impl PlaylistRole {
    #[must_use]
    pub const fn satisfies(self, level: AccessLevel) -> bool {
        match (self, level) {
            (Self::Owner, _) | (Self::Collaborator, AccessLevel::OwnerOrCollaborator) => true,
            (Self::Collaborator, AccessLevel::OwnerOnly) | (Self::None, _) => false,
        }
    }
}

impl Display for PlaylistRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Owner => "owner",
            Self::Collaborator => "collaborator",
            Self::None => "none",
        };
        f.write_str(s)
    }
}
