//! Validation boundary between untrusted form fields and [`EstimateInput`]
//!
//! Every field is checked and every failure is reported, so a form can mark
//! all offending inputs at once. Defaults for optional fields are decided
//! here and nowhere else.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::Serialize;

use super::{Construction, Deductible, EstimateInput, FieldValue, Occupancy, RawEstimateInput, RiskFlag, RiskFlags};

/// Earliest construction year accepted
pub const MIN_YEAR_BUILT: i32 = 1700;

/// Largest living area accepted, in square feet
pub const MAX_SQFT: f64 = 1_000_000.0;

/// Largest replacement cost override accepted, in dollars
pub const MAX_REPLACEMENT_COST: f64 = 10_000_000_000.0;

/// Reference point for date-dependent checks.
///
/// Validation never reads the clock itself; callers either pin a year or
/// build the context from the current date at the edge of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub as_of_year: i32,
}

impl ValidationContext {
    pub fn as_of(as_of_year: i32) -> Self {
        Self { as_of_year }
    }

    /// Context for the current local calendar year
    pub fn current() -> Self {
        Self::as_of(chrono::Local::now().year())
    }

    /// Latest construction year accepted (homes sold pre-completion)
    pub fn max_year_built(&self) -> i32 {
        self.as_of_year + 1
    }
}

/// Form field a validation error is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Sqft,
    YearBuilt,
    Occupancy,
    RoofAgeYears,
    Construction,
    Deductible,
    ReplacementCostOverride,
}

impl Field {
    /// Tag used by the deal form
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Sqft => "sqft",
            Field::YearBuilt => "yearBuilt",
            Field::Occupancy => "occupancy",
            Field::RoofAgeYears => "roofAgeYears",
            Field::Construction => "construction",
            Field::Deductible => "deductible",
            Field::ReplacementCostOverride => "replacementCostOverride",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("{field} must be a number (got {value:?})")]
    NotNumeric { field: Field, value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: Field },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: Field, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: Field, value: f64 },

    #[error("{field} must be a whole year (got {value})")]
    NotWholeYear { field: Field, value: f64 },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange { field: Field, value: f64, min: i32, max: i32 },

    #[error("{field} must be at most {max} (got {value})")]
    TooLarge { field: Field, value: f64, max: f64 },

    #[error("{field} must be one of {allowed} (got {value:?})")]
    NotAllowed {
        field: Field,
        value: String,
        allowed: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing { field }
            | FieldError::NotNumeric { field, .. }
            | FieldError::NotFinite { field }
            | FieldError::NotPositive { field, .. }
            | FieldError::Negative { field, .. }
            | FieldError::NotWholeYear { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::TooLarge { field, .. }
            | FieldError::NotAllowed { field, .. } => *field,
        }
    }
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid estimate input: {}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Offending fields without duplicates, in form order
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self.errors.iter().map(FieldError::field).collect();
        fields.dedup();
        fields
    }

    /// Messages grouped by field tag, for rendering next to each input
    pub fn messages(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut messages: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            messages
                .entry(error.field().as_str())
                .or_default()
                .push(error.to_string());
        }
        messages
    }
}

impl RawEstimateInput {
    /// Shorthand for [`validate`]
    pub fn validate(&self, ctx: &ValidationContext) -> Result<EstimateInput, ValidationErrors> {
        validate(self, ctx)
    }
}

/// Turn raw form fields into a validated [`EstimateInput`].
///
/// Defaults: occupancy `rental`, construction `unknown`, deductible 2500,
/// risk flags off.
pub fn validate(raw: &RawEstimateInput, ctx: &ValidationContext) -> Result<EstimateInput, ValidationErrors> {
    let mut errors = Vec::new();

    let sqft = keep(&mut errors, required_positive(Field::Sqft, raw.sqft.as_ref(), MAX_SQFT));
    let year_built = keep(&mut errors, year_built(raw.year_built.as_ref(), ctx));
    let occupancy = keep(
        &mut errors,
        choice(Field::Occupancy, raw.occupancy.as_ref(), Occupancy::parse, "owner, rental, vacant"),
    );
    let roof_age_years = keep(&mut errors, optional_non_negative(Field::RoofAgeYears, raw.roof_age_years.as_ref()));
    let construction = keep(
        &mut errors,
        choice(Field::Construction, raw.construction.as_ref(), Construction::parse, "frame, masonry, unknown"),
    );
    let deductible = keep(&mut errors, deductible(raw.deductible.as_ref()));
    let replacement_cost_override = keep(
        &mut errors,
        optional_positive(
            Field::ReplacementCostOverride,
            raw.replacement_cost_override.as_ref(),
            MAX_REPLACEMENT_COST,
        ),
    );

    let mut risk_flags = RiskFlags::default();
    for flag in RiskFlag::ALL {
        risk_flags.set(flag, raw.is_flag_checked(flag));
    }

    match (sqft, year_built, occupancy, roof_age_years, construction, deductible, replacement_cost_override) {
        (
            Some(sqft),
            Some(year_built),
            Some(occupancy),
            Some(roof_age_years),
            Some(construction),
            Some(deductible),
            Some(replacement_cost_override),
        ) => Ok(EstimateInput {
            sqft,
            year_built,
            occupancy: occupancy.unwrap_or_default(),
            roof_age_years,
            construction: construction.unwrap_or_default(),
            deductible: deductible.unwrap_or_default(),
            replacement_cost_override,
            risk_flags,
        }),
        _ => Err(ValidationErrors { errors }),
    }
}

fn keep<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Parse an optional numeric field. Blank counts as absent.
fn number(field: Field, value: Option<&FieldValue>) -> Result<Option<f64>, FieldError> {
    let n = match value {
        None => return Ok(None),
        Some(v) if v.is_blank() => return Ok(None),
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| FieldError::NotNumeric {
            field,
            value: s.clone(),
        })?,
        Some(FieldValue::Bool(b)) => {
            return Err(FieldError::NotNumeric {
                field,
                value: b.to_string(),
            })
        }
    };

    if !n.is_finite() {
        return Err(FieldError::NotFinite { field });
    }
    Ok(Some(n))
}

fn required_positive(field: Field, value: Option<&FieldValue>, max: f64) -> Result<f64, FieldError> {
    optional_positive(field, value, max)?.ok_or(FieldError::Missing { field })
}

/// Positive and at most `max`, so the premium product stays finite
fn optional_positive(field: Field, value: Option<&FieldValue>, max: f64) -> Result<Option<f64>, FieldError> {
    match number(field, value)? {
        Some(n) if n <= 0.0 => Err(FieldError::NotPositive { field, value: n }),
        Some(n) if n > max => Err(FieldError::TooLarge { field, value: n, max }),
        other => Ok(other),
    }
}

fn optional_non_negative(field: Field, value: Option<&FieldValue>) -> Result<Option<f64>, FieldError> {
    match number(field, value)? {
        Some(n) if n < 0.0 => Err(FieldError::Negative { field, value: n }),
        other => Ok(other),
    }
}

fn year_built(value: Option<&FieldValue>, ctx: &ValidationContext) -> Result<Option<i32>, FieldError> {
    let field = Field::YearBuilt;
    let Some(year) = number(field, value)? else {
        return Ok(None);
    };

    if year.fract() != 0.0 {
        return Err(FieldError::NotWholeYear { field, value: year });
    }
    let (min, max) = (MIN_YEAR_BUILT, ctx.max_year_built());
    if year < min as f64 || year > max as f64 {
        return Err(FieldError::OutOfRange { field, value: year, min, max });
    }
    Ok(Some(year as i32))
}

fn choice<T>(
    field: Field,
    value: Option<&FieldValue>,
    parse: fn(&str) -> Option<T>,
    allowed: &'static str,
) -> Result<Option<T>, FieldError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_blank() => Ok(None),
        Some(FieldValue::Text(s)) => parse(s.trim()).map(Some).ok_or_else(|| FieldError::NotAllowed {
            field,
            value: s.clone(),
            allowed,
        }),
        Some(other) => Err(FieldError::NotAllowed {
            field,
            value: other.display(),
            allowed,
        }),
    }
}

fn deductible(value: Option<&FieldValue>) -> Result<Option<Deductible>, FieldError> {
    let field = Field::Deductible;
    let Some(amount) = number(field, value)? else {
        return Ok(None);
    };

    Deductible::from_amount(amount)
        .map(Some)
        .ok_or_else(|| FieldError::NotAllowed {
            field,
            value: amount.to_string(),
            allowed: "1000, 2500, 5000",
        })
}
