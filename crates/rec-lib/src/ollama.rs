//! Chat client for the Ollama model backend
//!
//! The backend is opaque beyond its chat operation: a model identifier and
//! an ordered list of role-tagged messages go in, reply text comes out.
//! Every failure mode is folded into [`ModelError`] so the HTTP layer can
//! translate it into a gateway error exactly once.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Failure at the model backend boundary
#[derive(Debug, Error)]
pub enum ModelError {
    /// Could not reach the backend (connect failure or timeout)
    #[error("failed to reach model backend: {0}")]
    Connection(String),

    /// The exchange happened but the payload could not be built or decoded
    #[error("model backend protocol error: {0}")]
    Protocol(String),

    /// The backend answered with a non-success HTTP status
    #[error("model backend returned HTTP {status}: {body}")]
    RemoteStatus { status: u16, body: String },
}

/// One role-tagged message in a chat exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The one operation consumed from the model backend
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat request and return the reply text
    async fn chat(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, ModelError>;
}

/// Configuration for the Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama API
    pub host: String,
    /// Timeout applied to each chat call
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// HTTP client for Ollama's `/api/chat` endpoint
pub struct OllamaClient {
    client: Client,
    base_url: Url,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.host).context("Invalid Ollama host URL")?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String, ModelError> {
        let url = self
            .base_url
            .join("/api/chat")
            .map_err(|e| ModelError::Protocol(e.to_string()))?;

        let request = ChatRequest {
            model,
            messages: &messages,
            stream: false,
        };

        debug!(model = %model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ModelError::Connection(e.to_string())
                } else {
                    ModelError::Protocol(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::RemoteStatus { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Protocol(e.to_string()))?;

        Ok(chat.message.content)
    }
}
