use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::response::MessageResponse;
use common_services::database::get_db_pool;
use http::{HeaderValue, header};
use std::any::Any;
use std::iter::once;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// A panicking handler still answers with the generic server error.
fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::server_error()),
    )
        .into_response()
}

/// Router with the production middleware stack.
pub fn create_app(api_state: ApiContext) -> axum::Router {
    // --- CORS Configuration ---
    let allowed_origins: Vec<HeaderValue> = api_state
        .settings
        .api
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ]);

    create_router(api_state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SetSensitiveRequestHeadersLayer::new(once(
            header::AUTHORIZATION,
        )))
}

pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("Initializing server...");
    let pool = get_db_pool(&settings.secrets.database_url, &settings.database).await?;
    let api_state = ApiContext::postgres(pool, settings.clone());
    let app = create_app(api_state);

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server.");
}
