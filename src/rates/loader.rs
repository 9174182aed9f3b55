//! JSON rate table loader
//!
//! Used for what-if pricing against a candidate table. The file must hold a
//! complete table; nothing is merged with the standard one.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::RateTables;
use crate::error::EstimatorError;

impl RateTables {
    /// Load and check a table from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let tables: RateTables = serde_json::from_reader(BufReader::new(file))?;
        tables.check()?;
        log::info!("loaded rate table from {}", path.display());
        Ok(tables)
    }

    /// Parse and check a table from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, EstimatorError> {
        let tables: RateTables = serde_json::from_str(json)?;
        tables.check()?;
        Ok(tables)
    }

    pub fn to_json_pretty(&self) -> Result<String, EstimatorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_survives_json() {
        let json = RateTables::standard().to_json_pretty().unwrap();
        let parsed = RateTables::from_json_str(&json).unwrap();
        assert_eq!(parsed, RateTables::standard());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(RateTables::standard()).unwrap();
        assert_eq!(json["costPerSqft"]["frame"], 165.0);
        assert_eq!(json["deductible"]["2500"], 1.0);
        assert_eq!(json["baseRateRules"][0]["label"], "roof 15+ years old");
    }

    #[test]
    fn test_rejects_invalid_table() {
        let mut value = serde_json::to_value(RateTables::standard()).unwrap();
        value["baseRate"] = serde_json::json!(-0.01);
        let err = RateTables::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidRates(_)));

        let err = RateTables::from_json_str("{\"baseRate\": 0.003}").unwrap_err();
        assert!(matches!(err, EstimatorError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RateTables::from_json_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, EstimatorError::Io(_)));
    }
}
