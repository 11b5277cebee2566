//! Application startup and lifecycle management.
//!
//! Builds the shared state, the router with its middleware stack, and the
//! HTTP listener.

use crate::config::BfhlConfig;
use crate::handlers;
use crate::services::metrics::init_metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::TextProvider;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Shared application state. Immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BfhlConfig>,
    pub text_provider: Arc<dyn TextProvider>,
}

impl AppState {
    pub fn new(config: BfhlConfig, text_provider: Arc<dyn TextProvider>) -> Self {
        Self {
            config: Arc::new(config),
            text_provider,
        }
    }
}

/// Pick the text provider: Gemini when an API key is configured, otherwise
/// the mock.
pub fn build_text_provider(config: &BfhlConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    match &config.gemini.api_key {
        Some(api_key) => {
            let provider = GeminiTextProvider::new(GeminiConfig {
                api_key: api_key.clone(),
                model: config.gemini.model.clone(),
                base_url: config.gemini.base_url.clone(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

            tracing::info!(
                model = %config.gemini.model,
                "Initialized Gemini text provider"
            );
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, using mock text provider");
            Ok(Arc::new(MockTextProvider::default()))
        }
    }
}

/// Build the router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/bfhl", post(handlers::bfhl))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration and the provider
    /// chosen from it.
    pub async fn build(config: BfhlConfig) -> Result<Self, AppError> {
        let text_provider = build_text_provider(&config)?;
        Self::build_with_provider(config, text_provider).await
    }

    /// Build the application around an explicit text provider.
    pub async fn build_with_provider(
        config: BfhlConfig,
        text_provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        init_metrics();

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("bfhl service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, text_provider),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run the application until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
