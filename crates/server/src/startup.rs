use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, StorageBackend};
use service::Storage;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Assemble the router around an already-constructed store.
pub fn build_app(cfg: &AppConfig, storage: Arc<dyn Storage>) -> Router {
    let state = AppState::new(storage);
    routes::build_router(state, build_cors(), cfg.server.static_dir.as_deref())
}

/// Public entry: build the store and the app, then serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let store_file = (cfg.storage.backend == StorageBackend::Json).then_some(cfg.storage.path.as_str());
    common::env::ensure_env(cfg.server.static_dir.as_deref(), store_file).await?;

    let storage = service::build_storage(&cfg).await?;
    let app = build_app(&cfg, storage);

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, backend = %cfg.storage.backend, "journal server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("journal server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}
