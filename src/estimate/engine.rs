//! Premium computation over a validated property record

use log::debug;

use super::output::{Breakdown, EstimateOutput};
use crate::error::EstimatorError;
use crate::property::{validate, EstimateInput, RawEstimateInput, ValidationContext, ValidationErrors};
use crate::rates::RateTables;

/// Prices validated property records against a fixed set of rate tables.
///
/// Holds no state besides the tables, so one instance can be shared across
/// threads and requests.
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceEstimator {
    tables: RateTables,
}

impl InsuranceEstimator {
    /// Create an estimator over a checked rate table
    pub fn new(tables: RateTables) -> Result<Self, EstimatorError> {
        tables.check()?;
        Ok(Self { tables })
    }

    /// Estimator over the shipped pricing table
    pub fn standard() -> Self {
        Self {
            tables: RateTables::standard(),
        }
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    /// Compute the premium for a validated input.
    ///
    /// annual = replacement cost × base rate × occupancy × deductible × risk,
    /// monthly = annual / 12. Nothing is rounded.
    pub fn compute(&self, input: &EstimateInput) -> EstimateOutput {
        let tables = &self.tables;

        let cost_per_sqft = tables.cost_per_sqft.get(input.construction());
        let replacement_cost = input
            .replacement_cost_override()
            .unwrap_or(input.sqft() * cost_per_sqft);

        let mut base_rate = tables.base_rate;
        let mut base_rate_adjustments = Vec::new();
        for rule in &tables.base_rate_rules {
            if rule.trigger.fires(input) {
                base_rate = rule.adjustment.apply(base_rate);
                base_rate_adjustments.push(rule.label.clone());
            }
        }

        let occupancy_multiplier = tables.occupancy.get(input.occupancy());
        let deductible_multiplier = tables.deductible.get(input.deductible());
        let risk_multiplier = tables.risk.combined(&input.risk_flags());

        let annual = replacement_cost * base_rate * occupancy_multiplier * deductible_multiplier * risk_multiplier;
        let monthly = annual / 12.0;

        debug!(
            "estimate: replacement_cost={:.2} base_rate={:.6} adjustments={:?} occupancy={} deductible={} risk={} annual={:.2}",
            replacement_cost,
            base_rate,
            base_rate_adjustments,
            occupancy_multiplier,
            deductible_multiplier,
            risk_multiplier,
            annual,
        );

        EstimateOutput {
            annual,
            monthly,
            replacement_cost,
            breakdown: Breakdown {
                cost_per_sqft,
                base_rate,
                base_rate_adjustments,
                occupancy_multiplier,
                deductible_multiplier,
                risk_multiplier,
            },
        }
    }

    /// Validate raw fields, then compute. Nothing is computed when any field
    /// is rejected.
    pub fn estimate(
        &self,
        raw: &RawEstimateInput,
        ctx: &ValidationContext,
    ) -> Result<EstimateOutput, ValidationErrors> {
        let input = validate(raw, ctx)?;
        Ok(self.compute(&input))
    }
}

impl Default for InsuranceEstimator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Construction, Deductible, Field, Occupancy, RawRiskFlags, RiskFlag};
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use proptest::sample::select;

    fn ctx() -> ValidationContext {
        ValidationContext::as_of(2025)
    }

    /// 1850 sqft rental, built 1995, frame, 12-year roof, 2500 deductible, no flags
    fn regression_raw() -> RawEstimateInput {
        RawEstimateInput {
            sqft: Some("1850".into()),
            year_built: Some("1995".into()),
            occupancy: Some("rental".into()),
            roof_age_years: Some("12".into()),
            construction: Some("frame".into()),
            deductible: Some("2500".into()),
            replacement_cost_override: None,
            risk_flags: RawRiskFlags {
                flood: Some(false.into()),
                wildfire: Some(false.into()),
                hurricane: Some(false.into()),
                hail: Some(false.into()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_regression_fixture() {
        let estimator = InsuranceEstimator::standard();
        let output = estimator.estimate(&regression_raw(), &ctx()).unwrap();

        assert_eq!(output.breakdown.cost_per_sqft, 165.0);
        assert_eq!(output.replacement_cost, 1850.0 * 165.0);
        assert_eq!(output.breakdown.base_rate_adjustments, vec!["frame construction".to_string()]);
        assert_relative_eq!(output.breakdown.base_rate, 0.0037, epsilon = 1e-15);
        assert_eq!(output.breakdown.occupancy_multiplier, 1.15);
        assert_eq!(output.breakdown.deductible_multiplier, 1.0);
        assert_eq!(output.breakdown.risk_multiplier, 1.0);

        // 305,250 × 0.0037 × 1.15
        assert_relative_eq!(output.annual, 1298.83875, max_relative = 1e-12);
        assert_relative_eq!(output.monthly, 108.2365625, max_relative = 1e-12);
        assert_eq!(output.rounded_annual(), 1298.84);
    }

    #[test]
    fn test_old_house_fires_rules_in_order() {
        let raw = RawEstimateInput {
            year_built: Some(1925.into()),
            roof_age_years: Some(30.0.into()),
            construction: Some("masonry".into()),
            occupancy: Some("owner".into()),
            ..RawEstimateInput::with_sqft(2000.0)
        };
        let output = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap();

        assert_eq!(
            output.breakdown.base_rate_adjustments,
            vec![
                "roof 15+ years old",
                "roof 25+ years old",
                "built before 1980",
                "built before 1940",
                "masonry construction",
            ]
        );
        // ((0.0035 + 0.0004 + 0.0006 + 0.0005) × 1.15) × 0.95
        assert_relative_eq!(output.breakdown.base_rate, 0.005 * 1.15 * 0.95, max_relative = 1e-12);
        assert_eq!(output.replacement_cost, 2000.0 * 185.0);
    }

    #[test]
    fn test_unknown_age_is_neutral() {
        let raw = RawEstimateInput::with_sqft(1000.0);
        let output = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap();

        assert!(output.breakdown.base_rate_adjustments.is_empty());
        assert_eq!(output.breakdown.base_rate, 0.0035);
        assert_eq!(output.breakdown.cost_per_sqft, 175.0);
    }

    #[test]
    fn test_override_replaces_computed_cost() {
        let raw = RawEstimateInput {
            replacement_cost_override: Some("412345.67".into()),
            ..regression_raw()
        };
        let output = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap();

        assert_eq!(output.replacement_cost, 412_345.67);
        // Table rate is still reported
        assert_eq!(output.breakdown.cost_per_sqft, 165.0);
    }

    #[test]
    fn test_missing_sqft_is_not_computed() {
        let raw = RawEstimateInput {
            sqft: None,
            ..regression_raw()
        };
        let err = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap_err();
        assert_eq!(err.fields(), vec![Field::Sqft]);
    }

    #[test]
    fn test_out_of_set_deductible_is_rejected() {
        let raw = RawEstimateInput {
            deductible: Some(3000.0.into()),
            ..regression_raw()
        };
        let err = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap_err();
        assert_eq!(err.fields(), vec![Field::Deductible]);
    }

    #[test]
    fn test_all_flags() {
        let raw = RawEstimateInput {
            risk_flags: RawRiskFlags {
                flood: Some("on".into()),
                wildfire: Some("on".into()),
                hurricane: Some("on".into()),
                hail: Some("on".into()),
            },
            ..regression_raw()
        };
        let output = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap();
        assert_relative_eq!(output.breakdown.risk_multiplier, 1.35 * 1.3 * 1.4 * 1.1, max_relative = 1e-12);
    }

    #[test]
    fn test_flat_form_flags() {
        let raw: RawEstimateInput =
            serde_json::from_str(r#"{"sqft": "1850", "flood": "on", "hurricane": true}"#).unwrap();
        let output = InsuranceEstimator::standard().estimate(&raw, &ctx()).unwrap();

        assert_relative_eq!(output.breakdown.risk_multiplier, 1.35 * 1.4, max_relative = 1e-12);
        assert_relative_eq!(
            output.annual,
            1850.0 * 175.0 * 0.0035 * 1.15 * 1.35 * 1.4,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_construction_switches_rate_and_rules() {
        let base = regression_raw().validate(&ctx()).unwrap();
        let estimator = InsuranceEstimator::standard();

        let frame = estimator.compute(&base.clone().with_construction(Construction::Frame));
        let masonry = estimator.compute(&base.clone().with_construction(Construction::Masonry));
        let unknown = estimator.compute(&base.with_construction(Construction::Unknown));

        assert_eq!(frame.breakdown.cost_per_sqft, 165.0);
        assert_eq!(masonry.breakdown.cost_per_sqft, 185.0);
        assert_eq!(unknown.breakdown.cost_per_sqft, 175.0);

        assert_eq!(frame.breakdown.base_rate_adjustments, vec!["frame construction"]);
        assert_eq!(masonry.breakdown.base_rate_adjustments, vec!["masonry construction"]);
        assert!(unknown.breakdown.base_rate_adjustments.is_empty());
        assert_relative_eq!(masonry.breakdown.base_rate, 0.0035 * 0.95, max_relative = 1e-12);
    }

    #[test]
    fn test_new_rejects_bad_tables() {
        let mut tables = RateTables::standard();
        tables.risk.hail = -1.0;
        assert!(InsuranceEstimator::new(tables).is_err());
        assert!(InsuranceEstimator::new(RateTables::standard()).is_ok());
    }

    fn sample_input(
        sqft: f64,
        year_built: Option<i32>,
        roof_age: Option<f64>,
        occupancy: Occupancy,
        construction: Construction,
        deductible: Deductible,
        override_cost: Option<f64>,
        flags: [bool; 4],
    ) -> EstimateInput {
        let raw = RawEstimateInput {
            sqft: Some(sqft.into()),
            year_built: year_built.map(Into::into),
            occupancy: Some(occupancy.as_str().into()),
            roof_age_years: roof_age.map(Into::into),
            construction: Some(construction.as_str().into()),
            deductible: Some((deductible.amount() as f64).into()),
            replacement_cost_override: override_cost.map(Into::into),
            risk_flags: RawRiskFlags {
                flood: Some(flags[0].into()),
                wildfire: Some(flags[1].into()),
                hurricane: Some(flags[2].into()),
                hail: Some(flags[3].into()),
            },
            ..Default::default()
        };
        validate(&raw, &ctx()).unwrap()
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_estimate_invariants(
            sqft in 100.0f64..20_000.0,
            year_built in proptest::option::of(1700i32..2026),
            roof_age in proptest::option::of(0.0f64..80.0),
            occupancy in select(Occupancy::ALL.to_vec()),
            construction in select(Construction::ALL.to_vec()),
            deductible in select(Deductible::ALL.to_vec()),
            override_cost in proptest::option::of(10_000.0f64..5_000_000.0),
            flags in proptest::array::uniform4(proptest::bool::ANY),
        ) {
            let estimator = InsuranceEstimator::standard();
            let input = sample_input(
                sqft, year_built, roof_age, occupancy, construction, deductible, override_cost, flags,
            );
            let output = estimator.compute(&input);

            // Deterministic
            prop_assert_eq!(&output, &estimator.compute(&input));

            // Monthly is annual / 12
            prop_assert!((output.monthly - output.annual / 12.0).abs() <= 1e-9);

            // Positive everywhere
            prop_assert!(output.replacement_cost > 0.0);
            prop_assert!(output.annual > 0.0);
            prop_assert!(output.breakdown.base_rate > 0.0);
            prop_assert!(output.breakdown.occupancy_multiplier > 0.0);
            prop_assert!(output.breakdown.deductible_multiplier > 0.0);
            prop_assert!(output.breakdown.risk_multiplier > 0.0);

            // Formula
            let b = &output.breakdown;
            let expected = output.replacement_cost
                * b.base_rate
                * b.occupancy_multiplier
                * b.deductible_multiplier
                * b.risk_multiplier;
            prop_assert_eq!(output.annual, expected);

            // Override wins regardless of sqft
            if let Some(cost) = override_cost {
                prop_assert_eq!(output.replacement_cost, cost);
            } else {
                prop_assert_eq!(output.replacement_cost, sqft * b.cost_per_sqft);
            }
        }

        #[test]
        fn prop_flag_independence(
            sqft in 100.0f64..20_000.0,
            year_built in proptest::option::of(1700i32..2026),
            occupancy in select(Occupancy::ALL.to_vec()),
            flags in proptest::array::uniform4(proptest::bool::ANY),
            flag in select(RiskFlag::ALL.to_vec()),
        ) {
            let estimator = InsuranceEstimator::standard();
            let base = sample_input(
                sqft, year_built, None, occupancy, Construction::Unknown, Deductible::Usd2500, None, flags,
            );
            let before = estimator.compute(&base.clone().with_risk_flag(flag, false));
            let after = estimator.compute(&base.with_risk_flag(flag, true));

            let ratio = after.annual / before.annual;
            prop_assert!((ratio - estimator.tables().risk.get(flag)).abs() <= 1e-9);
        }

        #[test]
        fn prop_deductible_monotonic(
            sqft in 100.0f64..20_000.0,
            roof_age in proptest::option::of(0.0f64..80.0),
            occupancy in select(Occupancy::ALL.to_vec()),
            construction in select(Construction::ALL.to_vec()),
            flags in proptest::array::uniform4(proptest::bool::ANY),
        ) {
            let estimator = InsuranceEstimator::standard();
            let base = sample_input(
                sqft, Some(1990), roof_age, occupancy, construction, Deductible::Usd1000, None, flags,
            );
            let annuals: Vec<f64> = Deductible::ALL
                .iter()
                .map(|d| estimator.compute(&base.clone().with_deductible(*d)).annual)
                .collect();

            prop_assert!(annuals[1] <= annuals[0]);
            prop_assert!(annuals[2] <= annuals[1]);
        }

        #[test]
        fn prop_occupancy_ordering(
            sqft in 100.0f64..20_000.0,
            year_built in proptest::option::of(1700i32..2026),
            construction in select(Construction::ALL.to_vec()),
            deductible in select(Deductible::ALL.to_vec()),
            flags in proptest::array::uniform4(proptest::bool::ANY),
        ) {
            let estimator = InsuranceEstimator::standard();
            let base = sample_input(
                sqft, year_built, None, Occupancy::Rental, construction, deductible, None, flags,
            );
            let annual = |occupancy| estimator.compute(&base.clone().with_occupancy(occupancy)).annual;

            let (owner, rental, vacant) = (annual(Occupancy::Owner), annual(Occupancy::Rental), annual(Occupancy::Vacant));
            prop_assert!(owner < rental);
            prop_assert!(rental < vacant);
            let table = &estimator.tables().occupancy;
            prop_assert!((vacant / owner - table.get(Occupancy::Vacant) / table.get(Occupancy::Owner)).abs() <= 1e-9);
        }
    }
}
