use crate::api::playlist::error::PlaylistError;
use crate::database::collaboration_store::CollaborationStore;
use crate::database::playlist::{AccessLevel, Playlist, PlaylistRole};
use crate::database::playlist_store::PlaylistStore;
use std::sync::Arc;
use tracing::{instrument, warn};

/// A playlist together with the role the requesting user has on it.
#[derive(Debug, Clone)]
pub struct PlaylistAccess {
    pub playlist: Playlist,
    pub role: PlaylistRole,
}

/// Decides whether a user owns, collaborates on, or has no access to a playlist.
#[derive(Clone)]
pub struct AccessResolver {
    playlists: Arc<dyn PlaylistStore>,
    collaborations: Arc<dyn CollaborationStore>,
}

impl AccessResolver {
    #[must_use]
    pub fn new(
        playlists: Arc<dyn PlaylistStore>,
        collaborations: Arc<dyn CollaborationStore>,
    ) -> Self {
        Self {
            playlists,
            collaborations,
        }
    }

    /// Looks up the playlist and the user's role on it.
    ///
    /// A missing playlist is always `NotFound`, before any role is considered.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<PlaylistAccess, PlaylistError> {
        let playlist = self
            .playlists
            .find_by_id(playlist_id)
            .await?
            .ok_or_else(|| PlaylistError::NotFound("Playlist not found".to_string()))?;

        let role = if playlist.owner_id == user_id {
            PlaylistRole::Owner
        } else if self
            .collaborations
            .find_by_playlist_and_user(playlist_id, user_id)
            .await?
            .is_some()
        {
            PlaylistRole::Collaborator
        } else {
            PlaylistRole::None
        };

        Ok(PlaylistAccess { playlist, role })
    }

    /// The user's role on the playlist, without the playlist itself.
    pub async fn resolve_access(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<PlaylistRole, PlaylistError> {
        Ok(self.resolve(playlist_id, user_id).await?.role)
    }

    /// Fails with `Forbidden` when the user's role does not satisfy `required`.
    pub async fn verify_access(
        &self,
        playlist_id: &str,
        user_id: &str,
        required: AccessLevel,
    ) -> Result<PlaylistAccess, PlaylistError> {
        let access = self.resolve(playlist_id, user_id).await?;
        if !access.role.satisfies(required) {
            warn!(
                "User {} with role {} was denied {:?} access to playlist {}",
                user_id, access.role, required, playlist_id
            );
            return Err(PlaylistError::Forbidden(
                "You are not allowed to access this playlist".to_string(),
            ));
        }
        Ok(access)
    }
}
