//! Premium estimation engine

mod engine;
mod output;
mod stored;

pub use engine::InsuranceEstimator;
pub use output::{Breakdown, EstimateOutput};
pub use stored::StoredEstimate;
