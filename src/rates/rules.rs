//! Ordered age and construction adjustments to the base rate

use serde::{Deserialize, Serialize};

use crate::property::{Construction, EstimateInput};

/// Condition under which a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RuleTrigger {
    /// Roof at least this many years old. Unknown roof age never fires.
    RoofAgeAtLeast(f64),
    /// Built strictly before this year. Unknown year never fires.
    BuiltBefore(i32),
    /// Construction type matches
    Construction(Construction),
}

impl RuleTrigger {
    pub fn fires(&self, input: &EstimateInput) -> bool {
        match *self {
            RuleTrigger::RoofAgeAtLeast(years) => input.roof_age_years().is_some_and(|age| age >= years),
            RuleTrigger::BuiltBefore(year) => input.year_built().is_some_and(|built| built < year),
            RuleTrigger::Construction(kind) => input.construction() == kind,
        }
    }
}

/// How a fired rule changes the running base rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateAdjustment {
    /// Add to the rate (fraction of replacement cost)
    Add(f64),
    /// Scale the rate
    Multiply(f64),
}

impl RateAdjustment {
    pub fn apply(&self, rate: f64) -> f64 {
        match *self {
            RateAdjustment::Add(delta) => rate + delta,
            RateAdjustment::Multiply(factor) => rate * factor,
        }
    }
}

/// A labelled base-rate rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRateRule {
    /// Text reported in the breakdown when the rule fires
    pub label: String,
    pub trigger: RuleTrigger,
    pub adjustment: RateAdjustment,
}

impl BaseRateRule {
    pub fn new(label: &str, trigger: RuleTrigger, adjustment: RateAdjustment) -> Self {
        Self {
            label: label.to_string(),
            trigger,
            adjustment,
        }
    }
}

/// Lowest rate any combination of `rules` can reach from `base_rate`.
///
/// Both adjustment kinds are increasing in the running rate (multiply factors
/// are required to be positive), so tracking the running minimum across
/// fire/skip choices is exact.
pub(crate) fn minimum_reachable_rate(base_rate: f64, rules: &[BaseRateRule]) -> f64 {
    rules
        .iter()
        .fold(base_rate, |min, rule| min.min(rule.adjustment.apply(min)))
}
