//! Integration tests for the recommendation API endpoints

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rec_lib::{
    health::{components, HealthRegistry},
    observability::ServiceMetrics,
    ollama::{ChatClient, ChatMessage, ModelError},
    prompt::PromptTemplate,
};
use rec_server::api::{create_router, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// What the stubbed model backend should do on each call
enum StubBehavior {
    Reply(String),
    FailConnection(String),
}

/// Deterministic stand-in for the Ollama backend
struct StubChatClient {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl StubChatClient {
    fn replying(text: &str) -> Self {
        Self {
            behavior: StubBehavior::Reply(text.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: &str) -> Self {
        Self {
            behavior: StubBehavior::FailConnection(error.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for StubChatClient {
    async fn chat(&self, _model: &str, messages: Vec<ChatMessage>) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages;

        match &self.behavior {
            StubBehavior::Reply(text) => Ok(text.clone()),
            StubBehavior::FailConnection(error) => Err(ModelError::Connection(error.clone())),
        }
    }
}

async fn setup_test_app(stub: Arc<StubChatClient>) -> axum::Router {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL_BACKEND).await;
    health_registry.set_ready(true).await;

    let state = Arc::new(AppState::new(
        stub,
        "gemma3:12b".to_string(),
        PromptTemplate::default(),
        health_registry,
        ServiceMetrics::new(),
    ));

    create_router(state)
}

fn rec_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/get_llm_rec")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "cluster": "prod",
        "pod": "web-1",
        "cpu_data": [10, 20, 30],
        "ram_data": [40, 50, 60],
        "cpu_cost": 0.1,
        "ram_cost": 0.2,
    })
}

#[tokio::test]
async fn test_get_llm_rec_relays_model_reply() {
    let stub = Arc::new(StubChatClient::replying("Scale down pod"));
    let app = setup_test_app(stub.clone()).await;

    let response = app.oneshot(rec_request(&valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json, serde_json::json!({"recommendation": "Scale down pod"}));
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn test_get_llm_rec_prompt_carries_request_fields() {
    let stub = Arc::new(StubChatClient::replying("ok"));
    let app = setup_test_app(stub.clone()).await;

    app.oneshot(rec_request(&valid_body())).await.unwrap();

    let messages = stub.last_messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");

    let user = &messages[1];
    assert_eq!(user.role, "user");
    assert!(user.content.contains("web-1"));
    assert!(user.content.contains("prod"));
    assert!(user.content.contains("[10, 20, 30]"));
    assert!(user.content.contains("[40, 50, 60]"));
}

#[tokio::test]
async fn test_get_llm_rec_maps_backend_failure_to_502() {
    let stub = Arc::new(StubChatClient::failing("connection refused"));
    let app = setup_test_app(stub.clone()).await;

    let response = app.oneshot(rec_request(&valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let detail = json["detail"].as_str().unwrap();

    assert!(detail.contains("Ollama error:"));
    assert!(detail.contains("connection refused"));
}

#[tokio::test]
async fn test_get_llm_rec_rejects_missing_field_without_backend_call() {
    let stub = Arc::new(StubChatClient::replying("should not be called"));
    let app = setup_test_app(stub.clone()).await;

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("pod");

    let response = app.oneshot(rec_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_get_llm_rec_is_idempotent_against_deterministic_stub() {
    let stub = Arc::new(StubChatClient::replying("Scale down pod"));

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let app = setup_test_app(stub.clone()).await;
        let response = app.oneshot(rec_request(&valid_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(stub.call_count(), 2);
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let app = setup_test_app(Arc::new(StubChatClient::replying("ok"))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(health["status"], "healthy");
    assert!(health["components"]["model_backend"].is_object());
}

#[tokio::test]
async fn test_readyz_returns_ok_after_startup() {
    let app = setup_test_app(Arc::new(StubChatClient::replying("ok"))).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let readiness: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(readiness["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let stub = Arc::new(StubChatClient::replying("ok"));
    let app = setup_test_app(stub.clone()).await;

    // Drive one request through so counters exist with observations
    app.clone()
        .oneshot(rec_request(&valid_body()))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("llm_rec_requests_total"));
    assert!(metrics_text.contains("llm_rec_chat_latency_seconds"));
}
