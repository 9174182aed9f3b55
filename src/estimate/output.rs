//! Estimate result and its audit breakdown

use serde::{Deserialize, Serialize};

/// Every figure that went into an estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// Rebuild cost per square foot used for the replacement cost
    pub cost_per_sqft: f64,

    /// Annual rate after base-rate rules, as a fraction of replacement cost
    pub base_rate: f64,

    /// Labels of the rules that fired, in evaluation order
    pub base_rate_adjustments: Vec<String>,

    pub occupancy_multiplier: f64,

    pub deductible_multiplier: f64,

    /// Product of the multipliers for every active risk flag
    pub risk_multiplier: f64,
}

/// Premium estimate at full precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOutput {
    pub annual: f64,
    pub monthly: f64,
    pub replacement_cost: f64,
    pub breakdown: Breakdown,
}

impl EstimateOutput {
    /// Annual premium rounded to cents, for display only
    pub fn rounded_annual(&self) -> f64 {
        round_cents(self.annual)
    }

    /// Monthly premium rounded to cents, for display only
    pub fn rounded_monthly(&self) -> f64 {
        round_cents(self.monthly)
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
