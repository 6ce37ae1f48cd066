pub mod dto;
pub mod error;
pub mod extract;
mod handlers;

use crate::config::{Config, PaginationConfig, ServerConfig};
use crate::db::Database;
use crate::error::{AgroError, Result};
use crate::logic::filters::{self, Filter, PageRequest, PaginatedResult};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const SUPPORTED_VERSIONS: &str = "1.0, 2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(db: Database, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    /// Run store work on the blocking pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db)).await?
    }

    pub fn page<T, F: Filter<T>>(
        &self,
        items: Vec<T>,
        filter: &F,
        page: PageRequest,
    ) -> PaginatedResult<T> {
        filters::filter_and_paginate(
            items,
            filter,
            page,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
    }
}

fn versioned_routes(version: ApiVersion) -> Router<AppState> {
    Router::new()
        .merge(handlers::fields::routes(version))
        .merge(handlers::resources::routes(version))
        .merge(handlers::machines::routes(version))
        .merge(handlers::workers::routes(version))
        .merge(handlers::worker_tasks::routes(version))
        .merge(handlers::warehouses::routes())
        .merge(handlers::inventory_items::routes(version))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn api_not_found() -> AgroError {
    AgroError::NotFound("No such endpoint".into())
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/api/v1", versioned_routes(ApiVersion::V1))
        .nest("/api/v2", versioned_routes(ApiVersion::V2))
        .nest("/api/resource", handlers::legacy::routes())
        .with_state(state);

    let app = match &server.static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => api.fallback(api_not_found),
    };

    app.layer(SetResponseHeaderLayer::overriding(
        HeaderName::from_static("api-supported-versions"),
        HeaderValue::from_static(SUPPORTED_VERSIONS),
    ))
    .layer(DefaultBodyLimit::disable())
    .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
    .layer(cors_layer(&server.cors_allowed_origins))
    .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

pub async fn serve(config: &Config, db: Database) -> Result<()> {
    let state = AppState::new(db, config.pagination);
    let app = router(state, &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "AgroManage API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::{app, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn every_response_advertises_versions() {
        let (app, _) = app();
        let (status, headers, _) = send(&app, "GET", "/api/v1/resources", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["api-supported-versions"], "1.0, 2.0");

        let (status, headers, body) = send(&app, "GET", "/api/v3/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers["api-supported-versions"], "1.0, 2.0");
        assert_eq!(body["message"], "No such endpoint");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (app, _) = app();
        let (status, _, body) = send(
            &app,
            "POST",
            "/api/v1/resources",
            Some(serde_json::json!({"cultureType": "Barley"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn bad_path_id_is_bad_request() {
        let (app, _) = app();
        let (status, _, body) = send(&app, "GET", "/api/v1/workers/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }
}
