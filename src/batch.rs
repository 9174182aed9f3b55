//! Batch runner for pricing many deals at once
//!
//! Used by the admin review queue: every submitted deal is validated and
//! priced against the same estimator, in parallel, and rejected rows are
//! reported with their field errors instead of aborting the run.

use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::EstimatorError;
use crate::estimate::{EstimateOutput, InsuranceEstimator};
use crate::property::{DealRow, ValidationContext, ValidationErrors};

/// Result for a single deal
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub deal_id: String,
    pub result: Result<EstimateOutput, ValidationErrors>,
}

/// Totals over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub estimated: usize,
    pub rejected: usize,
    pub total_annual: f64,
    pub total_monthly: f64,
}

/// Pre-built estimator and validation context shared by every row
#[derive(Debug, Clone)]
pub struct BatchRunner {
    estimator: InsuranceEstimator,
    context: ValidationContext,
}

impl BatchRunner {
    pub fn new(estimator: InsuranceEstimator, context: ValidationContext) -> Self {
        Self { estimator, context }
    }

    pub fn estimator(&self) -> &InsuranceEstimator {
        &self.estimator
    }

    /// Price every row; output order matches input order
    pub fn run(&self, deals: &[DealRow]) -> Vec<BatchOutcome> {
        deals
            .par_iter()
            .map(|deal| {
                let result = self.estimator.estimate(&deal.input, &self.context);
                if let Err(errors) = &result {
                    log::warn!("deal {} rejected: {}", deal.deal_id, errors);
                }
                BatchOutcome {
                    deal_id: deal.deal_id.clone(),
                    result,
                }
            })
            .collect()
    }
}

pub fn summarize(outcomes: &[BatchOutcome]) -> BatchSummary {
    outcomes
        .iter()
        .fold(BatchSummary::default(), |mut summary, outcome| {
            match &outcome.result {
                Ok(output) => {
                    summary.estimated += 1;
                    summary.total_annual += output.annual;
                    summary.total_monthly += output.monthly;
                }
                Err(_) => summary.rejected += 1,
            }
            summary
        })
}

/// Flat CSV row for batch output
#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    deal_id: &'a str,
    status: &'static str,
    annual: Option<f64>,
    monthly: Option<f64>,
    replacement_cost: Option<f64>,
    cost_per_sqft: Option<f64>,
    base_rate: Option<f64>,
    base_rate_adjustments: String,
    occupancy_multiplier: Option<f64>,
    deductible_multiplier: Option<f64>,
    risk_multiplier: Option<f64>,
    errors: String,
}

impl<'a> OutcomeRow<'a> {
    fn from_outcome(outcome: &'a BatchOutcome) -> Self {
        match &outcome.result {
            Ok(output) => {
                let b = &output.breakdown;
                Self {
                    deal_id: &outcome.deal_id,
                    status: "estimated",
                    annual: Some(output.annual),
                    monthly: Some(output.monthly),
                    replacement_cost: Some(output.replacement_cost),
                    cost_per_sqft: Some(b.cost_per_sqft),
                    base_rate: Some(b.base_rate),
                    base_rate_adjustments: b.base_rate_adjustments.join("; "),
                    occupancy_multiplier: Some(b.occupancy_multiplier),
                    deductible_multiplier: Some(b.deductible_multiplier),
                    risk_multiplier: Some(b.risk_multiplier),
                    errors: String::new(),
                }
            }
            Err(errors) => Self {
                deal_id: &outcome.deal_id,
                status: "rejected",
                annual: None,
                monthly: None,
                replacement_cost: None,
                cost_per_sqft: None,
                base_rate: None,
                base_rate_adjustments: String::new(),
                occupancy_multiplier: None,
                deductible_multiplier: None,
                risk_multiplier: None,
                errors: errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "),
            },
        }
    }
}

/// Write outcomes as CSV with a header row
pub fn write_outcomes<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), EstimatorError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        csv_writer.serialize(OutcomeRow::from_outcome(outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}
