//! HTTP server for brandwrightd

use crate::routes;
use crate::service::ContentService;
use anyhow::Result;
use axum::middleware;
use axum::Router;
use brandwright_common::config::ServerConfig;
use brandwright_common::{Config, GeminiClient, TextGenerator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub service: ContentService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: ContentService) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    /// Build state from config, wiring the Gemini client when a credential exists
    pub fn from_config(config: &Config, api_key: Option<String>) -> Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match api_key {
            Some(key) => {
                info!("  Provider credential present, model {}", config.provider.model);
                Some(Arc::new(GeminiClient::new(config.provider.clone(), key)?))
            }
            None => {
                warn!("  No provider credential found; generation requests will fail with 500");
                None
            }
        };

        let service = ContentService::new(generator, config.generation.feature_defaults());
        Ok(Self::new(service))
    }
}

/// Assemble routes and middleware
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::generate_routes())
        .merge(routes::insight_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(middleware::map_response(routes::envelope_layer_errors))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c
pub async fn run(state: AppState, server: &ServerConfig) -> Result<()> {
    let app = router(state, server);

    let listener = tokio::net::TcpListener::bind(&server.bind_addr).await?;
    info!("  Listening on http://{}", server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully");
}
