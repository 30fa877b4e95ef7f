//! # Alert-Relay Service
//!
//! Binary entry point for the alert-relay HTTP service.
//!
//! This executable:
//! - Initializes logging
//! - Loads and validates configuration from files and environment
//! - Starts the HTTP server from alert-relay-service

use alert_relay_service::{config::ServiceConfig, start_server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "alert_relay_service=info,alert_relay_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Alert-Relay Service");

    // -------------------------------------------------------------------------
    // Load configuration
    //
    // Sources (applied in order — later sources override earlier ones):
    //  1. ./config/relay.yaml                 — deployment-local file
    //  2. Path given by RELAY_CONFIG_FILE env — operator-specified file
    //  3. Environment variables prefixed RELAY__ (double-underscore separator)
    //     e.g. RELAY__ENVIRONMENTS__STAGING__WEBHOOK_URL sets
    //     environments.staging.webhook_url
    //
    // Server settings carry serde defaults; the per-environment webhook URL,
    // project label, and (when auth is enabled) the credential pair are
    // required, and their absence aborts startup before the listener binds.
    // -------------------------------------------------------------------------
    let mut config_builder = config::Config::builder().add_source(
        config::File::with_name("config/relay")
            .required(false)
            .format(config::FileFormat::Yaml),
    );

    // Optional explicit path supplied by the operator.
    if let Ok(explicit_path) = std::env::var("RELAY_CONFIG_FILE") {
        if !explicit_path.is_empty() {
            config_builder = config_builder.add_source(
                config::File::with_name(&explicit_path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
            info!(path = %explicit_path, "Loading configuration from explicit path");
        }
    }

    let config = match config_builder
        .add_source(
            config::Environment::with_prefix("RELAY")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to build configuration; aborting");
            std::process::exit(3);
        }
    };

    let service_config: ServiceConfig = match config.try_deserialize() {
        Ok(sc) => sc,
        Err(e) => {
            error!(
                error = %e,
                "Could not deserialize service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    start_server(service_config).await?;

    Ok(())
}
