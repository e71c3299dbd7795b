//! Recommendation service - LLM-backed pod resource advice
//!
//! Accepts pod CPU/RAM usage series over HTTP, forwards them to a locally
//! hosted Ollama model and relays the recommendation text back.

use anyhow::Result;
use rec_lib::{
    health::{components, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    ollama::{OllamaClient, OllamaConfig},
    prompt::PromptTemplate,
};
use rec_server::{api, config};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting rec-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(model = %config.model, ollama_host = %config.ollama_host, "Service configured");

    // Build the Ollama client; its configuration is fixed for the process
    let ollama = OllamaClient::new(&OllamaConfig {
        host: config.ollama_host.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs),
    })?;

    let prompt = PromptTemplate::new(config.system_prompt(), config.prompt_template.clone());

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL_BACKEND).await;

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    metrics.set_model(&config.model);

    // Initialize structured logger
    let logger = StructuredLogger::new(&config.model);
    logger.log_startup(SERVICE_VERSION, &config.ollama_host);

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(
        Arc::new(ollama),
        config.model.clone(),
        prompt,
        health_registry.clone(),
        metrics.clone(),
    ));

    // Mark service as ready after initialization
    health_registry.set_ready(true).await;

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            logger.log_shutdown("SIGINT received");
        }
        result = api_handle => {
            result??;
        }
    }
    info!("Shutting down");

    Ok(())
}
