//! Request and response types for the recommendation API

use serde::{Deserialize, Serialize};

/// Inbound payload describing one pod's recent resource usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRequest {
    pub cluster: String,
    pub pod: String,
    pub cpu_data: Vec<f64>,
    pub ram_data: Vec<f64>,
    pub cpu_cost: f64,
    pub ram_cost: f64,
}

/// Successful response carrying the model's reply text unmodified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: String,
}

/// Error body returned when the model backend call fails
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
