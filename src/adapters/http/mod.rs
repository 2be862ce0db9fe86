//! HTTP inbound adapter.
//!
//! JSON endpoints under `/api`, the video proxy, and the console front-end as
//! fallback for every other path.

mod composite;
mod console;
mod extract;
pub mod error;
mod script;
mod speech;
pub mod state;
mod video;

pub use state::AppState;

use crate::application::video::PROXY_ROUTE;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Voice tracks travel base64 encoded inside the composite request.
const BODY_LIMIT: usize = 50 * 1024 * 1024;

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "kind": "NOT_FOUND" })),
    )
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();

    let api = Router::new()
        .route("/api/generate-script", post(script::generate_script))
        .route("/api/generate-video", post(video::generate_video))
        .route(PROXY_ROUTE, get(video::proxy_video))
        .route("/api/generate-speech", post(speech::generate_speech))
        .route("/api/composite", post(composite::composite))
        .route("/api/*path", any(api_not_found))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state);

    let index = static_dir.join("index.html");
    let app = if index.is_file() {
        info!(dir = ?static_dir, "Serving front-end build");
        let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(index));
        api.fallback_service(spa)
    } else {
        info!(dir = ?static_dir, "No front-end build found, serving the built-in console");
        api.fallback(console::console)
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
