//! Lookup tables keyed by construction, occupancy, deductible and peril

use serde::{Deserialize, Serialize};

use crate::property::{Construction, Deductible, Occupancy, RiskFlag, RiskFlags};

/// Rebuild cost per square foot by construction type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPerSqft {
    pub frame: f64,
    pub masonry: f64,
    pub unknown: f64,
}

impl CostPerSqft {
    pub fn get(&self, construction: Construction) -> f64 {
        match construction {
            Construction::Frame => self.frame,
            Construction::Masonry => self.masonry,
            Construction::Unknown => self.unknown,
        }
    }

    pub(crate) fn values(&self) -> [(&'static str, f64); 3] {
        [("frame", self.frame), ("masonry", self.masonry), ("unknown", self.unknown)]
    }
}

/// Premium multiplier by occupancy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyMultipliers {
    pub owner: f64,
    pub rental: f64,
    pub vacant: f64,
}

impl OccupancyMultipliers {
    pub fn get(&self, occupancy: Occupancy) -> f64 {
        match occupancy {
            Occupancy::Owner => self.owner,
            Occupancy::Rental => self.rental,
            Occupancy::Vacant => self.vacant,
        }
    }

    pub(crate) fn values(&self) -> [(&'static str, f64); 3] {
        [("owner", self.owner), ("rental", self.rental), ("vacant", self.vacant)]
    }
}

/// Premium multiplier by deductible tier; the 2500 tier is the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductibleMultipliers {
    #[serde(rename = "1000")]
    pub usd_1000: f64,
    #[serde(rename = "2500")]
    pub usd_2500: f64,
    #[serde(rename = "5000")]
    pub usd_5000: f64,
}

impl DeductibleMultipliers {
    pub fn get(&self, deductible: Deductible) -> f64 {
        match deductible {
            Deductible::Usd1000 => self.usd_1000,
            Deductible::Usd2500 => self.usd_2500,
            Deductible::Usd5000 => self.usd_5000,
        }
    }

    pub(crate) fn values(&self) -> [(&'static str, f64); 3] {
        [("1000", self.usd_1000), ("2500", self.usd_2500), ("5000", self.usd_5000)]
    }
}

/// Per-peril surcharge multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMultipliers {
    pub flood: f64,
    pub wildfire: f64,
    pub hurricane: f64,
    pub hail: f64,
}

impl RiskMultipliers {
    pub fn get(&self, flag: RiskFlag) -> f64 {
        match flag {
            RiskFlag::Flood => self.flood,
            RiskFlag::Wildfire => self.wildfire,
            RiskFlag::Hurricane => self.hurricane,
            RiskFlag::Hail => self.hail,
        }
    }

    /// Product over active flags; inactive flags contribute 1.0
    pub fn combined(&self, flags: &RiskFlags) -> f64 {
        flags.active().map(|flag| self.get(flag)).product()
    }

    pub(crate) fn values(&self) -> [(&'static str, f64); 4] {
        [
            ("flood", self.flood),
            ("wildfire", self.wildfire),
            ("hurricane", self.hurricane),
            ("hail", self.hail),
        ]
    }
}
