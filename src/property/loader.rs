//! Load deal property rows from CSV for batch review

use super::{FieldValue, RawEstimateInput, RawRiskFlags};
use crate::error::EstimatorError;
use csv::Reader;
use std::path::Path;

/// One deal waiting for an estimate
#[derive(Debug, Clone, PartialEq)]
pub struct DealRow {
    /// Deal identifier, or `row-N` when the file has none
    pub deal_id: String,
    pub input: RawEstimateInput,
}

/// Raw CSV row. Columns use the deal form's field names; risk flags are flat
/// checkbox columns. Missing columns read as absent.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CsvRow {
    deal_id: Option<String>,
    sqft: Option<String>,
    year_built: Option<String>,
    occupancy: Option<String>,
    roof_age_years: Option<String>,
    construction: Option<String>,
    deductible: Option<String>,
    replacement_cost_override: Option<String>,
    flood: Option<String>,
    wildfire: Option<String>,
    hurricane: Option<String>,
    hail: Option<String>,
}

impl CsvRow {
    fn to_deal(self, row_number: usize) -> DealRow {
        let text = |value: Option<String>| value.map(FieldValue::Text);
        let deal_id = self
            .deal_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("row-{}", row_number));

        DealRow {
            deal_id,
            input: RawEstimateInput {
                sqft: text(self.sqft),
                year_built: text(self.year_built),
                occupancy: text(self.occupancy),
                roof_age_years: text(self.roof_age_years),
                construction: text(self.construction),
                deductible: text(self.deductible),
                replacement_cost_override: text(self.replacement_cost_override),
                risk_flags: RawRiskFlags {
                    flood: text(self.flood),
                    wildfire: text(self.wildfire),
                    hurricane: text(self.hurricane),
                    hail: text(self.hail),
                },
                ..Default::default()
            },
        }
    }
}

/// Load all deal rows from a CSV file
pub fn load_deals<P: AsRef<Path>>(path: P) -> Result<Vec<DealRow>, EstimatorError> {
    let reader = Reader::from_path(path)?;
    read_deals(reader)
}

/// Load deal rows from any reader (e.g., string buffer, upload stream)
pub fn load_deals_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<DealRow>, EstimatorError> {
    read_deals(Reader::from_reader(reader))
}

fn read_deals<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<DealRow>, EstimatorError> {
    let mut deals = Vec::new();

    for (idx, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        deals.push(row.to_deal(idx + 1));
    }

    log::debug!("loaded {} deal rows", deals.len());
    Ok(deals)
}
