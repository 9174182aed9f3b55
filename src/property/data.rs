//! Property risk record consumed by the premium estimator

use serde::{Deserialize, Serialize};

/// Who occupies the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    /// Owner-occupied
    Owner,
    /// Leased to a tenant
    #[default]
    Rental,
    /// Nobody living in the property
    Vacant,
}

impl Occupancy {
    pub const ALL: [Occupancy; 3] = [Occupancy::Owner, Occupancy::Rental, Occupancy::Vacant];

    /// Parse the literal form value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(Occupancy::Owner),
            "rental" => Some(Occupancy::Rental),
            "vacant" => Some(Occupancy::Vacant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Occupancy::Owner => "owner",
            Occupancy::Rental => "rental",
            Occupancy::Vacant => "vacant",
        }
    }
}

/// Construction type of the structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Construction {
    /// Wood frame
    Frame,
    /// Brick, block or stone
    Masonry,
    /// Not reported
    #[default]
    Unknown,
}

impl Construction {
    pub const ALL: [Construction; 3] = [Construction::Frame, Construction::Masonry, Construction::Unknown];

    /// Parse the literal form value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "frame" => Some(Construction::Frame),
            "masonry" => Some(Construction::Masonry),
            "unknown" => Some(Construction::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Construction::Frame => "frame",
            Construction::Masonry => "masonry",
            Construction::Unknown => "unknown",
        }
    }
}

/// Deductible tier. Only the three listed dollar amounts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Deductible {
    /// $1,000
    Usd1000,
    /// $2,500
    #[default]
    Usd2500,
    /// $5,000
    Usd5000,
}

impl Deductible {
    /// Tiers in ascending order
    pub const ALL: [Deductible; 3] = [Deductible::Usd1000, Deductible::Usd2500, Deductible::Usd5000];

    /// Dollar amount of the tier
    pub fn amount(&self) -> u32 {
        match self {
            Deductible::Usd1000 => 1000,
            Deductible::Usd2500 => 2500,
            Deductible::Usd5000 => 5000,
        }
    }

    /// Match an amount exactly; values that merely round to a tier are rejected
    pub fn from_amount(amount: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.amount() as f64 == amount)
    }
}

impl From<Deductible> for u32 {
    fn from(deductible: Deductible) -> Self {
        deductible.amount()
    }
}

impl TryFrom<u32> for Deductible {
    type Error = String;

    fn try_from(amount: u32) -> Result<Self, Self::Error> {
        Deductible::from_amount(amount as f64)
            .ok_or_else(|| format!("unsupported deductible: {}", amount))
    }
}

/// A single catastrophe exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFlag {
    Flood,
    Wildfire,
    Hurricane,
    Hail,
}

impl RiskFlag {
    pub const ALL: [RiskFlag; 4] = [RiskFlag::Flood, RiskFlag::Wildfire, RiskFlag::Hurricane, RiskFlag::Hail];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::Flood => "flood",
            RiskFlag::Wildfire => "wildfire",
            RiskFlag::Hurricane => "hurricane",
            RiskFlag::Hail => "hail",
        }
    }
}

/// Catastrophe exposure zones the property sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RiskFlags {
    #[serde(default)]
    pub flood: bool,
    #[serde(default)]
    pub wildfire: bool,
    #[serde(default)]
    pub hurricane: bool,
    #[serde(default)]
    pub hail: bool,
}

impl RiskFlags {
    pub fn is_set(&self, flag: RiskFlag) -> bool {
        match flag {
            RiskFlag::Flood => self.flood,
            RiskFlag::Wildfire => self.wildfire,
            RiskFlag::Hurricane => self.hurricane,
            RiskFlag::Hail => self.hail,
        }
    }

    pub fn set(&mut self, flag: RiskFlag, value: bool) {
        match flag {
            RiskFlag::Flood => self.flood = value,
            RiskFlag::Wildfire => self.wildfire = value,
            RiskFlag::Hurricane => self.hurricane = value,
            RiskFlag::Hail => self.hail = value,
        }
    }

    /// Flags that are switched on, in declaration order
    pub fn active(&self) -> impl Iterator<Item = RiskFlag> + '_ {
        RiskFlag::ALL.into_iter().filter(move |flag| self.is_set(*flag))
    }
}

/// A validated property description ready for pricing.
///
/// Only [`crate::property::validate`] builds one, so `sqft` is always finite
/// and positive and every optional field has passed its range check. The
/// `with_*` methods only touch fields that carry no range invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    pub(crate) sqft: f64,
    pub(crate) year_built: Option<i32>,
    pub(crate) occupancy: Occupancy,
    pub(crate) roof_age_years: Option<f64>,
    pub(crate) construction: Construction,
    pub(crate) deductible: Deductible,
    pub(crate) replacement_cost_override: Option<f64>,
    pub(crate) risk_flags: RiskFlags,
}

impl EstimateInput {
    /// Living area in square feet
    pub fn sqft(&self) -> f64 {
        self.sqft
    }

    /// Construction year, if known
    pub fn year_built(&self) -> Option<i32> {
        self.year_built
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Roof age in years, if known
    pub fn roof_age_years(&self) -> Option<f64> {
        self.roof_age_years
    }

    pub fn construction(&self) -> Construction {
        self.construction
    }

    pub fn deductible(&self) -> Deductible {
        self.deductible
    }

    /// Caller-supplied rebuild cost that replaces `sqft × cost per sqft`
    pub fn replacement_cost_override(&self) -> Option<f64> {
        self.replacement_cost_override
    }

    pub fn risk_flags(&self) -> RiskFlags {
        self.risk_flags
    }

    pub fn with_occupancy(mut self, occupancy: Occupancy) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_construction(mut self, construction: Construction) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_deductible(mut self, deductible: Deductible) -> Self {
        self.deductible = deductible;
        self
    }

    pub fn with_risk_flag(mut self, flag: RiskFlag, value: bool) -> Self {
        self.risk_flags.set(flag, value);
        self
    }
}
