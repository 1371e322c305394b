//! Ask Anything Server
//!
//! HTTP front end for the question-answering pipeline.
//! Serves `POST /ask-anything` and `GET /health` with CORS for browser callers.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use ask_core::Orchestrator;
use ask_llm::{GeneratorBackend, LlmError};
use ask_store::{StoreBackend, StoreError};
use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generation backend could not be built
    #[error("Generator error: {0}")]
    Generator(#[from] LlmError),

    /// Store backend could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build backends and application state from configuration
///
/// Fails when the active backends are missing credentials, so a
/// misconfigured server never starts listening.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let store = Arc::new(StoreBackend::from_config(&config.store)?);
    let generator = Arc::new(GeneratorBackend::from_config(&config.generator)?);

    let orchestrator = Orchestrator::new(store.clone(), generator, store, config.orchestrator());

    Ok(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

/// Start the HTTP server
///
/// Builds backends from configuration and serves until the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Ask Anything server");
    info!("Bind address: {}", config.bind_addr());
    info!("Store backend: {:?}", config.store.backend);
    info!("Generator backend: {:?}", config.generator.backend);

    let state = build_state(&config)?;
    let app = create_router(state, &config.cors.allowed_origins);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
