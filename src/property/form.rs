//! Untrusted estimate fields as they arrive from a form or a stored JSON blob

use serde::{Deserialize, Serialize};

use super::{EstimateInput, RiskFlag};

/// A loosely typed field value.
///
/// HTML forms deliver text, stored estimates deliver numbers, and checkbox
/// fields may arrive as booleans. The validator accepts all three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Blank text is how a form reports an empty optional input
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    /// Checkbox semantics: a present, non-falsy value is checked
    pub fn to_flag(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => {
                let s = s.trim().to_ascii_lowercase();
                !matches!(s.as_str(), "" | "false" | "0" | "off" | "no")
            }
        }
    }

    /// Value as shown back in an error message
    pub fn display(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Raw risk flag checkboxes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRiskFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flood: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildfire: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hurricane: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hail: Option<FieldValue>,
}

/// Unvalidated estimate fields, named the way the deal form names them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEstimateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqft: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_age_years: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductible: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_cost_override: Option<FieldValue>,
    #[serde(default)]
    pub risk_flags: RawRiskFlags,

    // Flat checkbox fields as posted by the deal form. Read on input only;
    // a flag is on when either this or the nested `riskFlags` entry is checked.
    #[serde(default, skip_serializing)]
    pub flood: Option<FieldValue>,
    #[serde(default, skip_serializing)]
    pub wildfire: Option<FieldValue>,
    #[serde(default, skip_serializing)]
    pub hurricane: Option<FieldValue>,
    #[serde(default, skip_serializing)]
    pub hail: Option<FieldValue>,
}

impl RawRiskFlags {
    pub fn get(&self, flag: RiskFlag) -> Option<&FieldValue> {
        match flag {
            RiskFlag::Flood => self.flood.as_ref(),
            RiskFlag::Wildfire => self.wildfire.as_ref(),
            RiskFlag::Hurricane => self.hurricane.as_ref(),
            RiskFlag::Hail => self.hail.as_ref(),
        }
    }
}

impl RawEstimateInput {
    fn flat_flag(&self, flag: RiskFlag) -> Option<&FieldValue> {
        match flag {
            RiskFlag::Flood => self.flood.as_ref(),
            RiskFlag::Wildfire => self.wildfire.as_ref(),
            RiskFlag::Hurricane => self.hurricane.as_ref(),
            RiskFlag::Hail => self.hail.as_ref(),
        }
    }

    /// Whether the flag is checked in either the nested or the flat form
    pub fn is_flag_checked(&self, flag: RiskFlag) -> bool {
        [self.risk_flags.get(flag), self.flat_flag(flag)]
            .into_iter()
            .flatten()
            .any(FieldValue::to_flag)
    }

    /// Start from the only required field
    pub fn with_sqft(sqft: impl Into<FieldValue>) -> Self {
        Self {
            sqft: Some(sqft.into()),
            ..Default::default()
        }
    }
}

/// Parameters of a validated input, with every default spelled out.
/// This is the form persisted next to a deal for later audit.
impl From<&EstimateInput> for RawEstimateInput {
    fn from(input: &EstimateInput) -> Self {
        let flags = input.risk_flags();
        Self {
            sqft: Some(input.sqft().into()),
            year_built: input.year_built().map(FieldValue::from),
            occupancy: Some(input.occupancy().as_str().into()),
            roof_age_years: input.roof_age_years().map(FieldValue::from),
            construction: Some(input.construction().as_str().into()),
            deductible: Some((input.deductible().amount() as f64).into()),
            replacement_cost_override: input.replacement_cost_override().map(FieldValue::from),
            risk_flags: RawRiskFlags {
                flood: Some(flags.flood.into()),
                wildfire: Some(flags.wildfire.into()),
                hurricane: Some(flags.hurricane.into()),
                hail: Some(flags.hail.into()),
            },
            ..Default::default()
        }
    }
}
