//! Deconfliction Server - shared traffic registry with mission checks

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deconflict_server::api;
use deconflict_server::config::Config;
use deconflict_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("deconflict_server=debug".parse()?)
            .add_directive("deconflict_core=info".parse()?))
        .init();

    tracing::info!("Starting deconfliction server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Safety radius {} m, default time step {} s",
        config.safety_radius_m,
        config.default_time_step_s
    );
    let state = Arc::new(AppState::new(config)?);

    // Build the app
    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
