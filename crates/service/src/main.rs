//! Smart alerting service
//!
//! Hosts the metric analysis engine behind an HTTP API: anomaly
//! analysis, failure prediction, health probes, and Prometheus metrics.

use alerting_lib::{
    engine::{AnalysisEngine, EngineConfig},
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting alerting-service");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(service_name = %config.service_name, "Service configured");

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::ENGINE).await;
    health_registry.register(components::MODEL).await;

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    metrics.set_model_fitted(false);

    // Initialize structured logger
    let logger = StructuredLogger::new(&config.service_name);
    logger.log_startup(SERVICE_VERSION);

    // Construct the analysis engine; the single owner of the outlier
    // model's fit state, shared by reference with every request handler
    let engine = Arc::new(AnalysisEngine::new(EngineConfig::default()));

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        engine,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the API server
    tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
