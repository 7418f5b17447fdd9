mod config;
mod event;
mod routes;
mod services;
mod state;
mod upstream;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");
    let client = upstream::GenerationClient::from_config(&config).expect("generation client init failed");
    tracing::info!(base_url = client.base_url(), "generation client initialized");

    let poll = services::poll::PollPolicy::from_config(&config);
    let state = state::AppState::new(Arc::new(client), poll);

    let app = routes::app(state, config.static_dir.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "sketchboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
