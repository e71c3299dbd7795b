//! Metrics preprocessing
//!
//! Currently an identity transform. Reserved for future smoothing or
//! anomaly filtering once a concrete algorithm is chosen; until then the
//! series must pass through unchanged.

/// Pass CPU and RAM sample series through unchanged
pub fn preprocess_metrics(cpu_data: Vec<f64>, ram_data: Vec<f64>) -> (Vec<f64>, Vec<f64>) {
    (cpu_data, ram_data)
}
