//! Estimates persisted alongside a deal for later audit and redisplay

use serde::{Deserialize, Serialize};

use super::{EstimateOutput, InsuranceEstimator};
use crate::property::{EstimateInput, RawEstimateInput, ValidationContext, ValidationErrors};

/// What a deal record keeps: the input parameters (with defaults filled
/// in) and the two headline numbers. The breakdown is recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEstimate {
    pub params: RawEstimateInput,
    pub annual: f64,
    pub monthly: f64,
}

impl StoredEstimate {
    pub fn record(input: &EstimateInput, output: &EstimateOutput) -> Self {
        Self {
            params: RawEstimateInput::from(input),
            annual: output.annual,
            monthly: output.monthly,
        }
    }

    /// Re-run the stored parameters through validation and the estimator
    pub fn recompute(
        &self,
        estimator: &InsuranceEstimator,
        ctx: &ValidationContext,
    ) -> Result<EstimateOutput, ValidationErrors> {
        estimator.estimate(&self.params, ctx)
    }

    /// Whether the stored annual premium still matches what `estimator` gives
    /// for the same parameters, within `tolerance` currency units
    pub fn matches(
        &self,
        estimator: &InsuranceEstimator,
        ctx: &ValidationContext,
        tolerance: f64,
    ) -> Result<bool, ValidationErrors> {
        let output = self.recompute(estimator, ctx)?;
        let matches = (output.annual - self.annual).abs() <= tolerance;
        if !matches {
            log::debug!(
                "stored estimate drifted: stored annual={:.2} recomputed annual={:.2}",
                self.annual,
                output.annual
            );
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{FieldValue, RawRiskFlags};
    use crate::rates::RateTables;

    fn ctx() -> ValidationContext {
        ValidationContext::as_of(2025)
    }

    fn priced() -> (EstimateInput, EstimateOutput) {
        let raw = RawEstimateInput {
            year_built: Some("1962".into()),
            occupancy: Some("vacant".into()),
            construction: Some("frame".into()),
            risk_flags: RawRiskFlags {
                hurricane: Some("on".into()),
                ..Default::default()
            },
            ..RawEstimateInput::with_sqft("1400")
        };
        let input = raw.validate(&ctx()).unwrap();
        let output = InsuranceEstimator::standard().compute(&input);
        (input, output)
    }

    #[test]
    fn test_record_spells_out_defaults() {
        let (input, output) = priced();
        let stored = StoredEstimate::record(&input, &output);

        assert_eq!(stored.params.deductible, Some(FieldValue::Number(2500.0)));
        assert_eq!(stored.params.occupancy, Some(FieldValue::Text("vacant".to_string())));
        assert_eq!(stored.params.risk_flags.hurricane, Some(FieldValue::Bool(true)));
        assert_eq!(stored.params.risk_flags.flood, Some(FieldValue::Bool(false)));
        assert_eq!(stored.params.roof_age_years, None);
        assert_eq!(stored.annual, output.annual);
    }

    #[test]
    fn test_redisplay_from_json() {
        let (input, output) = priced();
        let json = serde_json::to_string(&StoredEstimate::record(&input, &output)).unwrap();

        let stored: StoredEstimate = serde_json::from_str(&json).unwrap();
        let estimator = InsuranceEstimator::standard();
        let recomputed = stored.recompute(&estimator, &ctx()).unwrap();

        assert_eq!(recomputed, output);
        assert!(stored.matches(&estimator, &ctx(), 0.005).unwrap());
    }

    #[test]
    fn test_detects_repricing() {
        let (input, output) = priced();
        let stored = StoredEstimate::record(&input, &output);

        let mut tables = RateTables::standard();
        tables.occupancy.vacant = 1.8;
        let repriced = InsuranceEstimator::new(tables).unwrap();

        assert!(!stored.matches(&repriced, &ctx(), 0.005).unwrap());
    }
}
