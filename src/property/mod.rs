//! Property risk records, form input, and validation

mod data;
mod form;
mod validation;
pub mod loader;

pub use data::{Construction, Deductible, EstimateInput, Occupancy, RiskFlag, RiskFlags};
pub use form::{FieldValue, RawEstimateInput, RawRiskFlags};
pub use validation::{
    validate, Field, FieldError, ValidationContext, ValidationErrors, MAX_REPLACEMENT_COST,
    MAX_SQFT, MIN_YEAR_BUILT,
};
pub use loader::{load_deals, load_deals_from_reader, DealRow};
