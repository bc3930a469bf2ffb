mod api_doc;
pub mod auth;
pub mod collaboration;
pub mod export;
pub mod playlist;
pub mod root;

use crate::api_state::ApiContext;
use crate::auth::middlewares::user::ApiUser;
use crate::collaboration::router::collaboration_protected_router;
use crate::export::router::export_protected_router;
use crate::playlist::router::playlist_protected_router;
use crate::root::router::root_public_router;
use axum::Router;
use axum::middleware::from_extractor_with_state;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(api_state.clone()))
        .with_state(api_state)
}

fn public_routes() -> Router<ApiContext> {
    Router::new().merge(root_public_router())
}

fn protected_routes(api_state: ApiContext) -> Router<ApiContext> {
    Router::new()
        .merge(playlist_protected_router())
        .merge(collaboration_protected_router())
        .merge(export_protected_router())
        .route_layer(from_extractor_with_state::<ApiUser, ApiContext>(api_state))
}
