//! # AI Customer Support Service
//!
//! Binary entry point for the customer support HTTP service.
//!
//! This executable:
//! - Loads configuration from files and the environment
//! - Initializes structured logging
//! - Starts the HTTP server from customer-support-api

use anyhow::Context;
use customer_support_api::{start_server, LoggingConfig, ServiceConfig};
use customer_support_core::PlaceholderRefreshTrigger;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first so the log format can follow it. A broken
    // configuration is still reported through tracing, using default settings.
    let service_config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default())?;
            error!(error = %e, "Failed to load service configuration; aborting");
            std::process::exit(3);
        }
    };

    init_tracing(&service_config.logging)?;

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        "Starting AI customer support service"
    );

    let refresh_trigger = Arc::new(PlaceholderRefreshTrigger);

    if let Err(e) = start_server(service_config, refresh_trigger).await {
        error!("Failed to start server: {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "customer_support_service={level},customer_support_api={level},customer_support_core={level},tower_http=debug",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to initialize JSON logging")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
