use std::path::Path;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod journal;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: journal API, health, OpenAPI document and,
/// when `static_dir` is set, the client bundle with an `index.html` fallback.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: Option<&str>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route(
            "/api/journal-entries",
            get(journal::list_entries).post(journal::create_entry),
        )
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            api.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => api,
    };

    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx responses are logged at ERROR
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
