//! Pricing policy: replacement cost, base rate, and premium multipliers
//!
//! The tables are versioned with the code. Changing a number here changes
//! every estimate, including the ones recomputed for stored deals.

mod multipliers;
mod rules;
pub mod loader;

pub use multipliers::{CostPerSqft, DeductibleMultipliers, OccupancyMultipliers, RiskMultipliers};
pub use rules::{BaseRateRule, RateAdjustment, RuleTrigger};

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;
use crate::property::Construction;

/// Starting annual rate as a fraction of replacement cost
pub const STANDARD_BASE_RATE: f64 = 0.0035;

/// Container for every table the estimator reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTables {
    pub cost_per_sqft: CostPerSqft,
    pub base_rate: f64,
    /// Evaluated in order; several may fire
    pub base_rate_rules: Vec<BaseRateRule>,
    pub occupancy: OccupancyMultipliers,
    pub deductible: DeductibleMultipliers,
    pub risk: RiskMultipliers,
}

impl RateTables {
    /// The shipped pricing table
    pub fn standard() -> Self {
        Self {
            cost_per_sqft: CostPerSqft {
                frame: 165.0,
                masonry: 185.0,
                unknown: 175.0,
            },
            base_rate: STANDARD_BASE_RATE,
            base_rate_rules: vec![
                BaseRateRule::new(
                    "roof 15+ years old",
                    RuleTrigger::RoofAgeAtLeast(15.0),
                    RateAdjustment::Add(0.0004),
                ),
                BaseRateRule::new(
                    "roof 25+ years old",
                    RuleTrigger::RoofAgeAtLeast(25.0),
                    RateAdjustment::Add(0.0006),
                ),
                BaseRateRule::new(
                    "built before 1980",
                    RuleTrigger::BuiltBefore(1980),
                    RateAdjustment::Add(0.0005),
                ),
                BaseRateRule::new(
                    "built before 1940",
                    RuleTrigger::BuiltBefore(1940),
                    RateAdjustment::Multiply(1.15),
                ),
                BaseRateRule::new(
                    "frame construction",
                    RuleTrigger::Construction(Construction::Frame),
                    RateAdjustment::Add(0.0002),
                ),
                BaseRateRule::new(
                    "masonry construction",
                    RuleTrigger::Construction(Construction::Masonry),
                    RateAdjustment::Multiply(0.95),
                ),
            ],
            occupancy: OccupancyMultipliers {
                owner: 1.0,
                rental: 1.15,
                vacant: 1.5,
            },
            deductible: DeductibleMultipliers {
                usd_1000: 1.1,
                usd_2500: 1.0,
                usd_5000: 0.9,
            },
            risk: RiskMultipliers {
                flood: 1.35,
                wildfire: 1.3,
                hurricane: 1.4,
                hail: 1.1,
            },
        }
    }

    /// Reject tables that could produce a non-positive premium
    pub fn check(&self) -> Result<(), EstimatorError> {
        let positive = |name: String, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EstimatorError::InvalidRates(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )))
            }
        };

        for (key, value) in self.cost_per_sqft.values() {
            positive(format!("costPerSqft.{}", key), value)?;
        }
        positive("baseRate".to_string(), self.base_rate)?;
        for (key, value) in self.occupancy.values() {
            positive(format!("occupancy.{}", key), value)?;
        }
        for (key, value) in self.deductible.values() {
            positive(format!("deductible.{}", key), value)?;
        }
        for (key, value) in self.risk.values() {
            positive(format!("risk.{}", key), value)?;
        }

        for rule in &self.base_rate_rules {
            match rule.adjustment {
                RateAdjustment::Add(delta) if !delta.is_finite() => {
                    return Err(EstimatorError::InvalidRates(format!(
                        "rule '{}' adds a non-finite amount",
                        rule.label
                    )));
                }
                RateAdjustment::Multiply(factor) => {
                    positive(format!("rule '{}' factor", rule.label), factor)?;
                }
                RateAdjustment::Add(_) => {}
            }
        }

        let floor = rules::minimum_reachable_rate(self.base_rate, &self.base_rate_rules);
        if floor <= 0.0 {
            return Err(EstimatorError::InvalidRates(format!(
                "base rate rules can drive the rate to {}",
                floor
            )));
        }

        Ok(())
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::standard()
    }
}
