//! Health check and server information endpoints.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server information served at the root.
#[derive(Serialize)]
pub struct ServerInfo {
    pub project_name: String,
    pub project_version: String,
    pub collections: Vec<String>,
    pub settings: Settings,
}

#[derive(Serialize)]
pub struct Settings {
    pub paginate_by: Option<usize>,
    pub delete_collection_enabled: bool,
}

/// Create health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Lists served collections and the settings that shape their behaviour.
async fn root(State(state): State<AppState>) -> Json<ServerInfo> {
    let mut collections: Vec<String> = state.resources.keys().cloned().collect();
    collections.sort();

    Json(ServerInfo {
        project_name: env!("CARGO_PKG_NAME").to_string(),
        project_version: env!("CARGO_PKG_VERSION").to_string(),
        collections,
        settings: Settings {
            paginate_by: state.config.paginate_by,
            delete_collection_enabled: state.config.delete_collection_enabled,
        },
    })
}
