use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use crate::handlers::{
    analyze_events, catalog, event_detail, health, query_events, upload_file, AppState,
};
use crate::openapi::ApiDoc;
use crate::upload_store::UploadStore;

// Same form cap the original service enforced.
const MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

const UPLOAD_SWEEP_INTERVAL_SECS: u64 = 60;

/// Build the full application router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload_file))
        .route("/api/analyze", post(analyze_events))
        .route("/api/query", post(query_events))
        .route("/api/catalog/:temp_id", get(catalog))
        .route("/event/:temp_id/:event_id", get(event_detail))
        .route(
            "/api-docs/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

pub async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr =
        std::env::var("GRIDDLE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

    let uploads = Arc::new(UploadStore::new()?);
    let state = Arc::new(AppState::new(Arc::clone(&uploads)));

    // Periodic TTL sweep so expired uploads don't sit on disk.
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(UPLOAD_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            uploads.evict_expired();
        }
    });

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Griddle listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {}", e);
    }
}
