use crate::api_state::ApiContext;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use common_services::api::export::interfaces::{EXPORT_QUEUED_MESSAGE, ExportPlaylistRequest};
use common_services::api::playlist::error::PlaylistError;
use common_services::api::response::MessageResponse;
use common_services::database::app_user::User;
use tracing::instrument;

/// Request an export of a playlist.
///
/// The export job is handed to a background worker, which mails the result to `targetEmail`.
/// A 201 means the request was accepted, not that the worker received it.
#[utoipa::path(
    post,
    path = "/export/playlists/{playlist_id}",
    tag = "Exports",
    params(
        ("playlist_id" = String, Path, description = "The id of the playlist.")
    ),
    request_body = ExportPlaylistRequest,
    responses(
        (status = 201, description = "Export request queued.", body = MessageResponse),
        (status = 400, description = "Missing or invalid targetEmail.", body = MessageResponse),
        (status = 403, description = "The user has no access to this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist not found.", body = MessageResponse),
        (status = 500, description = "The job could not be handed off.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn export_playlist_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    Path(playlist_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ExportPlaylistRequest>, PlaylistError>,
) -> Result<(StatusCode, Json<MessageResponse>), PlaylistError> {
    context
        .exports
        .submit_export(&playlist_id, &user.id, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::success(EXPORT_QUEUED_MESSAGE)),
    ))
}
