//! Jurisdiction rule tables.
//!
//! Everything the calculators and the scorer treat as law lives here as
//! immutable data. A [`RuleBook`] is built once at start-up and shared behind
//! an `Arc`; swapping jurisdictions means swapping the book, not the
//! algorithms.

use std::collections::HashMap;

use crate::models::{MatchWeights, PlotCategory};

/// 1 sq m = 10.764 sq ft
pub const SQFT_PER_SQM: f64 = 10.764;

/// 1 m = 3.28084 ft
pub const FEET_PER_METER: f64 = 3.28084;

/// Zone type assumed when the caller gives none
pub const DEFAULT_ZONE_TYPE: &str = "Residential";

/// Name of the fallback FAR table
pub const DEFAULT_FAR_TABLE: &str = "default";

/// Base and premium FAR for one road-width band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarRatio {
    pub base_far: f64,
    pub max_far: f64,
}

/// Bounded road-width band of a FAR table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarBand {
    /// Exclusive upper bound on road width
    pub below_road_width_ft: f64,
    pub ratio: FarRatio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FarRuleTable {
    pub name: String,
    pub min_far: f64,
    /// Ordered by ascending road width
    pub bands: Vec<FarBand>,
    /// Applies past the last bounded band
    pub beyond: FarRatio,
}

impl FarRuleTable {
    /// Bengaluru residential bands, used as the default table
    pub fn bengaluru() -> Self {
        let band = |below_road_width_ft, base_far, max_far| FarBand {
            below_road_width_ft,
            ratio: FarRatio { base_far, max_far },
        };
        Self {
            name: DEFAULT_FAR_TABLE.to_string(),
            min_far: 1.5,
            bands: vec![band(30.0, 1.5, 2.0), band(40.0, 2.0, 2.5), band(60.0, 2.5, 3.0)],
            beyond: FarRatio { base_far: 3.0, max_far: 3.25 },
        }
    }

    /// Ratio for the road width
    pub fn ratio_for(&self, road_width_ft: f64) -> FarRatio {
        self.bands
            .iter()
            .find(|band| road_width_ft < band.below_road_width_ft)
            .map(|band| band.ratio)
            .unwrap_or(self.beyond)
    }
}

/// FAR tables keyed by lower-cased city name
#[derive(Debug, Clone, PartialEq)]
pub struct FarRules {
    default: FarRuleTable,
    by_city: HashMap<String, FarRuleTable>,
}

impl FarRules {
    pub fn new(default: FarRuleTable) -> Self {
        Self {
            default,
            by_city: HashMap::new(),
        }
    }

    pub fn with_city(mut self, city: &str, table: FarRuleTable) -> Self {
        self.by_city.insert(city.trim().to_lowercase(), table);
        self
    }

    /// Table for a city; unknown or missing cities fall back to the default table
    pub fn table_for(&self, city: Option<&str>) -> &FarRuleTable {
        city.and_then(|c| self.by_city.get(&c.trim().to_lowercase()))
            .unwrap_or(&self.default)
    }
}

impl Default for FarRules {
    fn default() -> Self {
        Self::new(FarRuleTable::bengaluru())
    }
}

/// How a tier derives its clearances
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetbackRule {
    /// Fixed clearances in meters
    Fixed { front_m: f64, rear_m: f64, side_m: f64 },
    /// Front and rear as a share of the longer side, sides as a share of the shorter one
    Proportional { front_pct: f64, rear_pct: f64, side_pct: f64 },
}

/// Bounded setback tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetbackTier {
    /// Inclusive upper bound on plot area
    pub max_area_sqm: f64,
    pub category: PlotCategory,
    pub rule: SetbackRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetbackRules {
    /// Ordered by ascending area
    pub tiers: Vec<SetbackTier>,
    /// Applies above the last bounded tier
    pub beyond: (PlotCategory, SetbackRule),
}

impl SetbackRules {
    /// BBMP setback tiers
    pub fn bbmp() -> Self {
        let fixed = |front_m, rear_m, side_m| SetbackRule::Fixed { front_m, rear_m, side_m };
        Self {
            tiers: vec![
                SetbackTier {
                    max_area_sqm: 60.0,
                    category: PlotCategory::UpTo60,
                    rule: fixed(0.7, 0.0, 0.6),
                },
                SetbackTier {
                    max_area_sqm: 150.0,
                    category: PlotCategory::From60To150,
                    rule: fixed(0.9, 0.7, 0.7),
                },
                SetbackTier {
                    max_area_sqm: 250.0,
                    category: PlotCategory::From150To250,
                    rule: fixed(1.0, 0.8, 0.8),
                },
                SetbackTier {
                    max_area_sqm: 4000.0,
                    category: PlotCategory::From250To4000,
                    rule: SetbackRule::Proportional { front_pct: 0.12, rear_pct: 0.08, side_pct: 0.08 },
                },
            ],
            beyond: (PlotCategory::Above4000, fixed(5.0, 5.0, 5.0)),
        }
    }

    /// Category and rule for a plot area. Bounds are inclusive.
    pub fn tier_for(&self, area_sqm: f64) -> (PlotCategory, SetbackRule) {
        self.tiers
            .iter()
            .find(|tier| area_sqm <= tier.max_area_sqm)
            .map(|tier| (tier.category, tier.rule))
            .unwrap_or(self.beyond)
    }
}

impl Default for SetbackRules {
    fn default() -> Self {
        Self::bbmp()
    }
}

/// Modeling assumptions behind the floor and yield figures.
/// These are planning simplifications, not structural engineering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldAssumptions {
    /// Stilt plus four upper floors
    pub max_floors: u32,
    pub average_unit_size_sqft: f64,
    /// Share of built-up area that is saleable
    pub saleable_efficiency: f64,
}

impl Default for YieldAssumptions {
    fn default() -> Self {
        Self {
            max_floors: 5,
            average_unit_size_sqft: 1000.0,
            saleable_efficiency: 0.75,
        }
    }
}

/// Competitive price band used to normalise quoted prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub low_per_sqft: f64,
    pub high_per_sqft: f64,
}

impl Default for PriceBand {
    fn default() -> Self {
        Self {
            low_per_sqft: 1000.0,
            high_per_sqft: 5000.0,
        }
    }
}

/// All rule tables for one jurisdiction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleBook {
    pub far: FarRules,
    pub setbacks: SetbackRules,
    pub yields: YieldAssumptions,
    pub weights: MatchWeights,
    pub price_band: PriceBand,
}

impl RuleBook {
    pub fn with_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_yields(mut self, yields: YieldAssumptions) -> Self {
        self.yields = yields;
        self
    }

    /// Reject tables the calculators cannot use
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        if self.yields.average_unit_size_sqft <= 0.0 {
            return Err("average unit size must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.yields.saleable_efficiency) {
            return Err("saleable efficiency must be within [0, 1]".to_string());
        }
        if self.price_band.high_per_sqft <= self.price_band.low_per_sqft {
            return Err("price band upper bound must exceed lower bound".to_string());
        }
        Ok(())
    }
}
