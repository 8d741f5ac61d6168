// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `kindred serve` command implementation.
//!
//! Wires storage, the Anthropic completion adapter, the insight generator and
//! the HTTP route layer together, then serves until Ctrl-C or SIGTERM.

use std::sync::Arc;

use kindred_anthropic::AnthropicProvider;
use kindred_config::KindredConfig;
use kindred_core::{KindredError, PluginAdapter, StorageAdapter};
use kindred_gateway::{start_server, AppState, AuthConfig};
use kindred_insight::InsightGenerator;
use kindred_storage::SqliteStorage;
use tracing::{error, info, warn};

/// Runs the server until a shutdown signal arrives.
pub async fn run_serve(config: KindredConfig) -> Result<(), KindredError> {
    init_tracing(&config.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting kindred serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage ready");

    let completion = match AnthropicProvider::new(&config.anthropic) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!(error = %e, "failed to initialize Anthropic provider");
            storage.close().await?;
            return Err(e);
        }
    };

    let generator = Arc::new(InsightGenerator::new(
        storage.clone(),
        completion.clone(),
        &config.insight,
    ));

    let state = AppState::new(
        storage.clone(),
        generator,
        AuthConfig {
            bearer_token: config.server.bearer_token.clone(),
        },
    );
    if config.server.bearer_token.is_none() {
        warn!("server.bearer_token is not set -- API routes are unauthenticated");
    }

    let served = start_server(&config.server, state, shutdown_signal()).await;

    info!("shutting down");
    if let Err(e) = completion.shutdown().await {
        warn!(error = %e, "completion adapter shutdown failed");
    }
    if let Err(e) = storage.close().await {
        error!(error = %e, "failed to close storage");
    }
    served
}

/// Resolves on Ctrl-C, or on SIGTERM where supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the config level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kindred={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
