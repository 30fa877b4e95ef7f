//! # Alert-Relay HTTP Service
//!
//! Hosting shell around the `alert-relay-core` pipeline.
//!
//! This service provides:
//! - `POST /staging` and `POST /production` relay endpoints, each bound to
//!   one immutable environment configuration
//! - A liveness endpoint at `GET /health`
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! The original webhook sender only ever observes a status code; all error
//! detail stays in the server-side logs.

pub mod config;


use alert_relay_core::{run_chain, BasicAuthGate, RelayContext, RelayStage, WebhookForwarder};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use crate::config::{EnvironmentConfig, ServiceConfig};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
///
/// Holds the two per-environment stage chains, built once at startup and
/// shared immutably across request tasks.
#[derive(Clone)]
pub struct AppState {
    pub staging: Arc<EnvironmentHandler>,
    pub production: Arc<EnvironmentHandler>,
}

impl AppState {
    /// Build both environment handlers from validated configuration.
    ///
    /// The reqwest client is shared across environments; each handler keeps
    /// only its own immutable settings.
    pub fn from_config(config: &ServiceConfig, client: reqwest::Client) -> Self {
        Self {
            staging: Arc::new(EnvironmentHandler::from_config(
                "staging",
                &config.environments.staging,
                client.clone(),
            )),
            production: Arc::new(EnvironmentHandler::from_config(
                "production",
                &config.environments.production,
                client,
            )),
        }
    }
}

/// One environment's bound stage chain.
pub struct EnvironmentHandler {
    name: &'static str,
    stages: Vec<Arc<dyn RelayStage>>,
}

impl EnvironmentHandler {
    /// Assemble the chain for one environment: the auth gate when a
    /// credential pair is configured, then the forwarder.
    pub fn from_config(
        name: &'static str,
        config: &EnvironmentConfig,
        client: reqwest::Client,
    ) -> Self {
        let mut stages: Vec<Arc<dyn RelayStage>> = Vec::with_capacity(2);

        if let Some(auth) = &config.auth {
            stages.push(Arc::new(BasicAuthGate::new(
                auth.username.clone(),
                auth.password.clone(),
            )));
        }

        stages.push(Arc::new(WebhookForwarder::new(
            client,
            config.webhook_url.clone(),
            config.project_label.clone(),
            config.formatting,
        )));

        Self { name, stages }
    }

    /// Run one inbound request through this environment's chain.
    #[instrument(skip(self, headers, body), fields(environment = self.name))]
    pub async fn relay(&self, headers: &HeaderMap, body: Bytes) -> StatusCode {
        // Lower axum headers into the framework-free context representation.
        let header_map: HashMap<String, String> = headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_lowercase(),
                    v.to_str().unwrap_or("").to_string(),
                )
            })
            .collect();

        let mut ctx = RelayContext::new(header_map, body);
        run_chain(&self.stages, &mut ctx).await;

        info!(status = %ctx.status, "Relay chain completed");
        ctx.status
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/staging", post(handle_staging))
        .route("/production", post(handle_production))
        .route("/health", get(handle_health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
///
/// Binds the configured listener and serves until SIGINT/SIGTERM, allowing
/// in-flight requests to complete before returning.
pub async fn start_server(config: ServiceConfig) -> Result<(), ServiceError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| ServiceError::ClientBuildFailed {
            message: e.to_string(),
        })?;

    let state = AppState::from_config(&config, client);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: addr.clone(),
                message: e.to_string(),
            })?;

    info!("Starting HTTP server on {}", addr);

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down");
            },
            _ = terminate => {
                info!("Received SIGTERM, shutting down");
            },
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Server lifecycle failures. All abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to construct HTTP client: {message}")]
    ClientBuildFailed { message: String },

    #[error("failed to bind {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("HTTP server failed: {message}")]
    ServerFailed { message: String },
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_staging(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    state.staging.relay(&headers, body).await
}

async fn handle_production(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    state.production.relay(&headers, body).await
}

/// Basic liveness endpoint
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}
