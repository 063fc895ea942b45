//! Proxied variant: an HTTP service that holds the credential and performs
//! the completion call on behalf of browser front-ends.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{RecipeResponse, STATUS_MESSAGE};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::{error, info};
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::gateway::CompletionGateway;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CompletionGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self { gateway }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_status))
        .route(
            "/api/generate-recipe",
            post(handlers::handle_generate_recipe),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid listen address {}:{}: {}", config.host, config.port, e),
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Server running on {} (provider: {})",
        listener.local_addr()?,
        state.gateway.provider_name()
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolve once `signal` fires. If the handler cannot be installed the
/// server keeps running rather than stopping straight away.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
