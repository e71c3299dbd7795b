//! Core library for the pod recommendation service
//!
//! This crate provides the building blocks for the HTTP service:
//! - Request/response models for the recommendation API
//! - Metrics preprocessing
//! - Prompt construction from a configurable template
//! - Ollama chat client with an explicit error type
//! - Health checks and observability

pub mod health;
pub mod models;
pub mod observability;
pub mod ollama;
pub mod preprocess;
pub mod prompt;

pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::ServiceMetrics;
