// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the route layer.

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use kindred_config::model::ServerConfig;
use kindred_core::{KindredError, StorageAdapter};
use kindred_insight::InsightGenerator;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store shared by every handler.
    pub storage: Arc<dyn StorageAdapter>,
    /// Insight generator behind POST /analyze.
    pub generator: Arc<InsightGenerator>,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        generator: Arc<InsightGenerator>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            storage,
            generator,
            auth,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Builds the full router:
/// - GET /health (no auth)
/// - GET/POST /relationships, GET /relationships/{id}
/// - GET/POST /events, GET /insights, POST /analyze
/// - GET/POST /messages
pub fn build_router(state: AppState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/relationships",
            get(handlers::list_relationships).post(handlers::create_relationship),
        )
        .route("/relationships/{id}", get(handlers::get_relationship))
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/insights", get(handlers::list_insights))
        .route("/analyze", post(handlers::analyze))
        .route(
            "/messages",
            get(handlers::list_messages).post(handlers::ingest_messages),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server and serve until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), KindredError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KindredError::Internal(format!("failed to bind {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map_err(|e| KindredError::Internal(format!("failed to read bound address: {e}")))?;
    tracing::info!("Kindred server listening on {local}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| KindredError::Internal(format!("server error: {e}")))?;

    tracing::info!("Kindred server stopped");
    Ok(())
}
