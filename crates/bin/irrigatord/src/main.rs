//! # irrigatord: irrigation controller daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing`
//! - Construct the device API adapter
//! - Construct the irrigation service, injecting the adapter via its port trait
//! - Start the poller and build the axum router
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT): stop serving, then stop polling
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use irrigator_adapter_device_http::HttpPumpController;
use irrigator_adapter_http_axum::state::AppState;
use irrigator_app::poller;
use irrigator_app::services::irrigation_service::IrrigationService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Device
    let controller = HttpPumpController::new(&config.device)?;
    tracing::info!(device = %config.device.base_url, "using device API");

    // Service + poll loop
    let service = Arc::new(IrrigationService::new(
        controller,
        config.automation_config()?,
    ));
    let poller = poller::spawn(Arc::clone(&service), config.poll_interval());

    // HTTP
    let state = AppState::new(service, config.refresh_seconds());
    let app = irrigator_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "irrigatord listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poller.shutdown().await;
    tracing::info!("irrigatord stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
