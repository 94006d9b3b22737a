//! API server initialization

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::middleware;
use super::openapi::openapi_json;
use super::routes::{filters, health};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::filters::FilterPolicy;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered and in-flight requests drain
    pub async fn start(self) -> Result<()> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse()
                .with_context(|| format!("Invalid server host: {}", host))?,
            port,
        );

        let router = router(app.config.filters.policy());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!(%addr, "Listening");

        let serving = axum::serve(listener, router).with_graceful_shutdown(shutdown.wait());
        match shutdown.drain(serving.into_future()).await {
            Some(result) => result?,
            None => tracing::warn!("Forced shutdown with requests still in flight"),
        }

        tracing::debug!("Server stopped");
        Ok(())
    }
}

/// Build the full API router for a filter policy
pub fn router(policy: FilterPolicy) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/v1/filters", filters::routes(policy))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}
