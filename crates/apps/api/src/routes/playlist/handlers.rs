use crate::api_state::ApiContext;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use common_services::api::playlist::error::PlaylistError;
use common_services::api::playlist::interfaces::{
    CreatePlaylistRequest, PlaylistCreatedData, PlaylistSongRequest, PlaylistSongsData,
    PlaylistsData,
};
use common_services::api::response::{DataResponse, MessageResponse};
use common_services::database::app_user::User;
use tracing::instrument;

/// Create a new playlist.
///
/// The requesting user becomes the owner.
#[utoipa::path(
    post,
    path = "/playlists",
    tag = "Playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created. The data is wrapped in a success envelope.", body = PlaylistCreatedData),
        (status = 400, description = "Invalid request body.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_playlist_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePlaylistRequest>, PlaylistError>,
) -> Result<(StatusCode, Json<DataResponse<PlaylistCreatedData>>), PlaylistError> {
    let playlist = context.playlists.create_playlist(&user.id, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::success(PlaylistCreatedData {
            playlist_id: playlist.id,
        })),
    ))
}

/// List the playlists of the current user.
///
/// Includes playlists the user owns and playlists shared with them.
#[utoipa::path(
    get,
    path = "/playlists",
    tag = "Playlists",
    responses(
        (status = 200, description = "The user's playlists, wrapped in a success envelope.", body = PlaylistsData),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_playlists_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
) -> Result<Json<DataResponse<PlaylistsData>>, PlaylistError> {
    let playlists = context.playlists.list_playlists(&user.id).await?;
    Ok(Json(DataResponse::success(PlaylistsData { playlists })))
}

/// Delete a playlist. Only the owner may do this.
#[utoipa::path(
    delete,
    path = "/playlists/{playlist_id}",
    tag = "Playlists",
    params(
        ("playlist_id" = String, Path, description = "The id of the playlist.")
    ),
    responses(
        (status = 200, description = "Playlist deleted.", body = MessageResponse),
        (status = 403, description = "The user does not own this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist not found.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_playlist_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(playlist_id): Path<String>,
) -> Result<Json<MessageResponse>, PlaylistError> {
    context
        .playlists
        .delete_playlist(&playlist_id, &user.id)
        .await?;
    Ok(Json(MessageResponse::success("Playlist deleted")))
}

/// Add a song to a playlist.
///
/// Allowed for the owner and for collaborators.
#[utoipa::path(
    post,
    path = "/playlists/{playlist_id}/songs",
    tag = "Playlists",
    params(
        ("playlist_id" = String, Path, description = "The id of the playlist.")
    ),
    request_body = PlaylistSongRequest,
    responses(
        (status = 201, description = "Song added to the playlist.", body = MessageResponse),
        (status = 400, description = "Invalid request body.", body = MessageResponse),
        (status = 403, description = "The user has no access to this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist or song not found.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add_song_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(playlist_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<PlaylistSongRequest>, PlaylistError>,
) -> Result<(StatusCode, Json<MessageResponse>), PlaylistError> {
    context
        .playlists
        .add_song(&playlist_id, &user.id, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::success("Song added to playlist")),
    ))
}

/// Get a playlist with its songs.
#[utoipa::path(
    get,
    path = "/playlists/{playlist_id}/songs",
    tag = "Playlists",
    params(
        ("playlist_id" = String, Path, description = "The id of the playlist.")
    ),
    responses(
        (status = 200, description = "The playlist and its songs, wrapped in a success envelope.", body = PlaylistSongsData),
        (status = 403, description = "The user has no access to this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist not found.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_playlist_songs_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(playlist_id): Path<String>,
) -> Result<Json<DataResponse<PlaylistSongsData>>, PlaylistError> {
    let playlist = context
        .playlists
        .get_playlist_songs(&playlist_id, &user.id)
        .await?;
    Ok(Json(DataResponse::success(PlaylistSongsData { playlist })))
}

/// Remove a song from a playlist.
#[utoipa::path(
    delete,
    path = "/playlists/{playlist_id}/songs",
    tag = "Playlists",
    params(
        ("playlist_id" = String, Path, description = "The id of the playlist.")
    ),
    request_body = PlaylistSongRequest,
    responses(
        (status = 200, description = "Song removed from the playlist.", body = MessageResponse),
        (status = 400, description = "Invalid request body.", body = MessageResponse),
        (status = 403, description = "The user has no access to this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist or song not found.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove_song_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(playlist_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<PlaylistSongRequest>, PlaylistError>,
) -> Result<Json<MessageResponse>, PlaylistError> {
    context
        .playlists
        .remove_song(&playlist_id, &user.id, &payload)
        .await?;
    Ok(Json(MessageResponse::success("Song removed from playlist")))
}
