//! Errors raised while loading deal files and rate tables

/// Failure outside the pure estimate path (files, CSV, JSON, bad tables).
/// Input validation failures are reported as
/// [`crate::property::ValidationErrors`] instead.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rate table: {0}")]
    InvalidRates(String),
}
