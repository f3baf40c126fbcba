use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let server_config = &state.config.server;

    // Unknown paths get the SPA entry file so client-side routing works
    let static_files = ServeDir::new(&server_config.static_dir)
        .fallback(ServeFile::new(server_config.index_path()));

    Router::new()
        .route("/translate", post(handlers::translate))
        .route("/api/health", get(handlers::health))
        .fallback_service(static_files)
}
