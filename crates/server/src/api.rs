//! HTTP API for pod recommendations, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use rec_lib::{
    health::{ComponentStatus, HealthRegistry},
    models::{ErrorResponse, MetricsRequest, RecommendationResponse},
    observability::ServiceMetrics,
    ollama::ChatClient,
    preprocess::preprocess_metrics,
    prompt::PromptTemplate,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state, immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatClient>,
    pub model: String,
    pub prompt: PromptTemplate,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        model: String,
        prompt: PromptTemplate,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
    ) -> Self {
        Self {
            chat,
            model,
            prompt,
            health_registry,
            metrics,
        }
    }
}

/// Recommendation endpoint: preprocess the series, render the prompt,
/// relay the model's reply. Any backend failure becomes a 502 with the
/// underlying error text embedded.
async fn get_llm_rec(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MetricsRequest>,
) -> Result<Json<RecommendationResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.metrics.inc_requests();

    let (cpu_data, ram_data) = preprocess_metrics(request.cpu_data, request.ram_data);
    let messages = state.prompt.messages(
        &request.cluster,
        &request.pod,
        &cpu_data,
        &ram_data,
        request.cpu_cost,
        request.ram_cost,
    );

    let started = Instant::now();
    match state.chat.chat(&state.model, messages).await {
        Ok(content) => {
            state
                .metrics
                .observe_chat_latency(started.elapsed().as_secs_f64());
            info!(
                cluster = %request.cluster,
                pod = %request.pod,
                model = %state.model,
                "Recommendation generated"
            );
            Ok(Json(RecommendationResponse {
                recommendation: content,
            }))
        }
        Err(err) => {
            state.metrics.inc_upstream_errors();
            error!(
                cluster = %request.cluster,
                pod = %request.pod,
                error = %err,
                "Model backend call failed"
            );
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    detail: format!("Ollama error: {err}"),
                }),
            ))
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get_llm_rec", post(get_llm_rec))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
