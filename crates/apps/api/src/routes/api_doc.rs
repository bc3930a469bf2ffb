use crate::routes::{collaboration, export, playlist, root};
use common_services::api::collaboration::interfaces::{
    CollaborationCreatedData, CollaborationRequest,
};
use common_services::api::export::interfaces::ExportPlaylistRequest;
use common_services::api::playlist::interfaces::{
    CreatePlaylistRequest, PlaylistCreatedData, PlaylistSongRequest, PlaylistSongsData,
    PlaylistsData,
};
use common_services::api::response::{MessageResponse, ResponseStatus};
use common_services::database::playlist::{PlaylistSummary, PlaylistWithSongs};
use common_services::database::song::SongSummary;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        root::handlers::openapi_json,
        // Playlist handlers
        playlist::handlers::create_playlist_handler,
        playlist::handlers::get_playlists_handler,
        playlist::handlers::delete_playlist_handler,
        playlist::handlers::add_song_handler,
        playlist::handlers::get_playlist_songs_handler,
        playlist::handlers::remove_song_handler,
        // Collaboration handlers
        collaboration::handlers::add_collaborator_handler,
        collaboration::handlers::remove_collaborator_handler,
        // Export handlers
        export::handlers::export_playlist_handler,
    ),
    components(
        schemas(
            MessageResponse,
            ResponseStatus,
            CreatePlaylistRequest,
            PlaylistSongRequest,
            PlaylistCreatedData,
            PlaylistsData,
            PlaylistSongsData,
            PlaylistSummary,
            PlaylistWithSongs,
            SongSummary,
            CollaborationRequest,
            CollaborationCreatedData,
            ExportPlaylistRequest,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Health and documentation endpoints"),
        (name = "Playlists", description = "Endpoints for managing playlists and their songs"),
        (name = "Collaborations", description = "Endpoints for sharing playlists with other users"),
        (name = "Exports", description = "Endpoints for requesting playlist exports"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
