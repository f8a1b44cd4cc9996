//! Shelf Server - HTTP transport for shelf collection resources.
//!
//! Every collection of the served schema is exposed under `/{collection}`,
//! with its records under `/{collection}/{id}`. Request handling is delegated
//! to the shelf-engine resources; this crate only extracts inputs and maps
//! outcomes onto status codes, headers and JSON bodies.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use crate::config::Config;
use crate::error::AppError;
use axum::{http::HeaderName, Router};
use shelf_engine::{CollectionSchema, FieldDef, FieldType, MemoryStorage, Resource, Schema};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<HashMap<String, Resource<MemoryStorage>>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Serve every collection of `schema` from one in-memory backend.
    pub fn new(config: Config, schema: &Schema) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let resources = schema
            .collections
            .values()
            .map(|collection| {
                let resource = Resource::new(
                    collection.clone(),
                    Arc::clone(&storage),
                    config.resource_config(),
                );
                (collection.name.clone(), resource)
            })
            .collect();

        Self {
            resources: Arc::new(resources),
            config: Arc::new(config),
        }
    }

    /// Look up the resource serving a collection.
    pub fn resource(&self, name: &str) -> Result<&Resource<MemoryStorage>, AppError> {
        self.resources
            .get(name)
            .ok_or_else(|| AppError::UnknownCollection(name.to_string()))
    }

    /// Host used for links when the request carries none.
    pub fn fallback_host(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Schema served by the binary.
pub fn default_schema() -> Schema {
    Schema::new().with_collection(CollectionSchema::new(
        "mushrooms",
        vec![FieldDef::required("name", FieldType::String).unique()],
    ))
}

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([
                    HeaderName::from_static("next-page"),
                    HeaderName::from_static("total-records"),
                    HeaderName::from_static("last-modified"),
                ]),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(AppState::new(Config::default(), &default_schema()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_collection() {
        let response = app()
            .oneshot(Request::get("/truffles").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], 404);
        assert_eq!(body["error"], "Not Found");
    }

    #[tokio::test]
    async fn create_returns_envelope() {
        let request = Request::post("/mushrooms")
            .header("content-type", "application/json")
            .body(Body::from(json!({"data": {"name": "Morel"}}).to_string()))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("last-modified"));

        let body = body_json(response).await;
        assert_eq!(body["data"]["name"], "Morel");
    }

    #[tokio::test]
    async fn unsupported_method() {
        let response = app()
            .oneshot(Request::put("/mushrooms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
