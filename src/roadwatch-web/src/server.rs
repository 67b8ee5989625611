//! Axum server setup and routing

use crate::error::ERROR_KIND_HEADER;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::post,
    Router,
};
use roadwatch_detect::Detector;
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Frames arrive base64-encoded, so allow well above axum's 2 MB default
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Build the gateway router with CORS and request tracing
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", post(routes::detect_violations))
        .route("/detect-violations", post(routes::detect_violations))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([
                    AUTHORIZATION,
                    HeaderName::from_static("x-client-info"),
                    HeaderName::from_static("apikey"),
                    CONTENT_TYPE,
                ])
                .expose_headers([ERROR_KIND_HEADER]),
        )
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway and run until `shutdown` resolves
pub async fn serve<F>(
    detector: Detector,
    addr: SocketAddr,
    max_body_bytes: usize,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(AppState::new(detector), max_body_bytes);

    info!("starting roadwatch gateway on http://{}", addr);
    info!("detection endpoint: http://{}/detect-violations", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("gateway stopped");
    Ok(())
}
