//! Property Insurance - Premium estimator for wholesale real-estate deals
//!
//! This library provides:
//! - Validation of untrusted deal-form fields into a typed property record
//! - Versioned pricing tables (replacement cost, base rate, multipliers)
//! - A pure, deterministic premium computation with a full breakdown
//! - Stored-estimate records for audit and redisplay
//! - Parallel batch pricing for review queues

pub mod error;
pub mod property;
pub mod rates;
pub mod estimate;
pub mod batch;

// Re-export commonly used types
pub use error::EstimatorError;
pub use property::{EstimateInput, RawEstimateInput, ValidationContext, ValidationErrors};
pub use rates::RateTables;
pub use estimate::{Breakdown, EstimateOutput, InsuranceEstimator, StoredEstimate};
pub use batch::BatchRunner;
