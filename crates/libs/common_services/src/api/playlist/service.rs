use super::interfaces::{CreatePlaylistRequest, PlaylistSongRequest};
use crate::api::playlist::access::AccessResolver;
use crate::api::playlist::error::PlaylistError;
use crate::database::DbError;
use crate::database::playlist::{AccessLevel, Playlist, PlaylistSummary, PlaylistWithSongs};
use crate::database::playlist_store::PlaylistStore;
use crate::utils::prefixed_id;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Playlist management on behalf of an authenticated user.
#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistStore>,
    access: AccessResolver,
}

impl PlaylistService {
    #[must_use]
    pub fn new(playlists: Arc<dyn PlaylistStore>, access: AccessResolver) -> Self {
        Self { playlists, access }
    }

    /// Creates a playlist owned by `owner_id`.
    #[instrument(skip(self))]
    pub async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist, PlaylistError> {
        request.validate()?;

        let playlist_id = prefixed_id("playlist");
        let playlist = self
            .playlists
            .create(&playlist_id, request.name.trim(), owner_id)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation(_) => {
                    PlaylistError::NotFound("User not found".to_string())
                }
                e => e.into(),
            })?;

        info!("Created playlist {} for user {}", playlist.id, owner_id);
        Ok(playlist)
    }

    /// Lists the playlists the user owns or collaborates on.
    #[instrument(skip(self))]
    pub async fn list_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, PlaylistError> {
        Ok(self.playlists.list_for_user(user_id).await?)
    }

    /// Deletes a playlist. Only the owner may do this.
    #[instrument(skip(self))]
    pub async fn delete_playlist(&self, playlist_id: &str, user_id: &str) -> Result<(), PlaylistError> {
        self.access
            .verify_access(playlist_id, user_id, AccessLevel::OwnerOnly)
            .await?;

        // Someone else may have deleted it between the access check and now.
        if self.playlists.delete(playlist_id).await? == 0 {
            return Err(PlaylistError::NotFound("Playlist not found".to_string()));
        }

        info!("Deleted playlist {}", playlist_id);
        Ok(())
    }

    /// Adds a song to the playlist. Owners and collaborators may do this.
    #[instrument(skip(self))]
    pub async fn add_song(
        &self,
        playlist_id: &str,
        user_id: &str,
        request: &PlaylistSongRequest,
    ) -> Result<(), PlaylistError> {
        request.validate()?;
        self.access
            .verify_access(playlist_id, user_id, AccessLevel::OwnerOrCollaborator)
            .await?;

        self.playlists
            .add_song(playlist_id, &request.song_id)
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation(_) => {
                    PlaylistError::NotFound("Song not found".to_string())
                }
                e => e.into(),
            })?;

        Ok(())
    }

    /// Returns the playlist with its songs. Owners and collaborators may do this.
    #[instrument(skip(self))]
    pub async fn get_playlist_songs(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<PlaylistWithSongs, PlaylistError> {
        let access = self
            .access
            .verify_access(playlist_id, user_id, AccessLevel::OwnerOrCollaborator)
            .await?;

        let (username_res, songs_res) = tokio::join!(
            self.playlists.find_owner_username(playlist_id),
            self.playlists.list_songs(playlist_id),
        );
        let username = username_res?
            .ok_or_else(|| PlaylistError::NotFound("Playlist not found".to_string()))?;

        Ok(PlaylistWithSongs {
            id: access.playlist.id,
            name: access.playlist.name,
            username,
            songs: songs_res?,
        })
    }

    /// Removes a song from the playlist. Owners and collaborators may do this.
    #[instrument(skip(self))]
    pub async fn remove_song(
        &self,
        playlist_id: &str,
        user_id: &str,
        request: &PlaylistSongRequest,
    ) -> Result<(), PlaylistError> {
        request.validate()?;
        self.access
            .verify_access(playlist_id, user_id, AccessLevel::OwnerOrCollaborator)
            .await?;

        if self.playlists.remove_song(playlist_id, &request.song_id).await? == 0 {
            return Err(PlaylistError::NotFound(format!(
                "Song {} is not in playlist {playlist_id}",
                request.song_id
            )));
        }

        Ok(())
    }
}
