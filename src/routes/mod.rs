//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the proxy endpoints and the room relay socket under one Axum
//! router. When a static directory is configured, the browser pages (board
//! and viewer) are served from it as the fallback.

pub mod proxy;
pub mod socket;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API and socket routes.
pub fn app(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/prompt", post(proxy::prompt))
        .route("/api/enhance", post(proxy::enhance))
        .route("/api/generate", post(proxy::generate))
        .route("/api/streams/{id}", get(proxy::stream_status))
        .route("/socket", get(socket::handle_socket))
        .route("/healthz", get(healthz));

    // Fallback goes on before the layers so static pages are traced too.
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
