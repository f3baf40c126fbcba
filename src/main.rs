mod config;
mod error;
mod handlers;
mod llm;
mod routes;
mod state;
mod translate;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cosmic_translate=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {:#}", e);
        e
    })?;

    info!(
        "Using model {} with intent filter {}",
        config.llm.model, config.intent_filter.mode
    );

    let index_path = config.server.index_path();
    if !index_path.exists() {
        warn!("Frontend entry file {} not found", index_path.display());
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = AppState::new(config)?;

    let app = routes::create_routes(&app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
