use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::api::collaboration::service::CollaborationService;
use common_services::api::export::service::ExportService;
use common_services::api::playlist::access::AccessResolver;
use common_services::api::playlist::service::PlaylistService;
use common_services::database::collaboration_store::{CollaborationStore, PgCollaborationStore};
use common_services::database::playlist_store::{PgPlaylistStore, PlaylistStore};
use common_services::database::user_store::{PgUserStore, UserStore};
use common_services::message_channel::{MessageChannel, PgMessageChannel};
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a request handler needs. Built once at startup and cloned per request.
#[derive(Clone)]
pub struct ApiContext {
    pub settings: AppSettings,
    pub users: Arc<dyn UserStore>,
    pub playlists: PlaylistService,
    pub collaborations: CollaborationService,
    pub exports: ExportService,
}

impl ApiContext {
    /// Wires the services on top of the given stores and channel.
    pub fn new(
        settings: AppSettings,
        users: Arc<dyn UserStore>,
        playlists: Arc<dyn PlaylistStore>,
        collaborations: Arc<dyn CollaborationStore>,
        channel: Arc<dyn MessageChannel>,
    ) -> Self {
        let access = AccessResolver::new(playlists.clone(), collaborations.clone());
        Self {
            playlists: PlaylistService::new(playlists, access.clone()),
            collaborations: CollaborationService::new(collaborations, users.clone(), access.clone()),
            exports: ExportService::new(access, channel, settings.exports.clone()),
            users,
            settings,
        }
    }

    /// Postgres stores on `pool`, and a lazily connected Postgres message channel.
    pub fn postgres(pool: PgPool, settings: AppSettings) -> Self {
        let channel = Arc::new(PgMessageChannel::new(&settings.channel));
        Self::new(
            settings,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgPlaylistStore::new(pool.clone())),
            Arc::new(PgCollaborationStore::new(pool)),
            channel,
        )
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
