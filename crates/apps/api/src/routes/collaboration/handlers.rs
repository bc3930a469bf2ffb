use crate::api_state::ApiContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use common_services::api::collaboration::interfaces::{
    CollaborationCreatedData, CollaborationRequest,
};
use common_services::api::playlist::error::PlaylistError;
use common_services::api::response::{DataResponse, MessageResponse};
use common_services::database::app_user::User;
use tracing::instrument;

/// Share a playlist with another user.
///
/// Only the playlist owner can add collaborators.
#[utoipa::path(
    post,
    path = "/collaborations",
    tag = "Collaborations",
    request_body = CollaborationRequest,
    responses(
        (status = 201, description = "Collaborator added, wrapped in a success envelope.", body = CollaborationCreatedData),
        (status = 400, description = "Invalid request body.", body = MessageResponse),
        (status = 403, description = "The user does not own this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist or user not found.", body = MessageResponse),
        (status = 409, description = "The user already collaborates on this playlist.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add_collaborator_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    WithRejection(Json(payload), _): WithRejection<Json<CollaborationRequest>, PlaylistError>,
) -> Result<(StatusCode, Json<DataResponse<CollaborationCreatedData>>), PlaylistError> {
    let collaboration = context
        .collaborations
        .add_collaborator(&user.id, &payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::success(CollaborationCreatedData {
            collaboration_id: collaboration.id,
        })),
    ))
}

/// Stop sharing a playlist with a user.
#[utoipa::path(
    delete,
    path = "/collaborations",
    tag = "Collaborations",
    request_body = CollaborationRequest,
    responses(
        (status = 200, description = "Collaborator removed.", body = MessageResponse),
        (status = 400, description = "Invalid request body.", body = MessageResponse),
        (status = 403, description = "The user does not own this playlist.", body = MessageResponse),
        (status = 404, description = "Playlist or collaboration not found.", body = MessageResponse),
        (status = 500, description = "A database or internal error occurred.", body = MessageResponse),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn remove_collaborator_handler(
    State(context): State<ApiContext>,
    Extension(user): Extension<User>,
    WithRejection(Json(payload), _): WithRejection<Json<CollaborationRequest>, PlaylistError>,
) -> Result<Json<MessageResponse>, PlaylistError> {
    context
        .collaborations
        .remove_collaborator(&user.id, &payload)
        .await?;
    Ok(Json(MessageResponse::success("Collaborator removed")))
}
