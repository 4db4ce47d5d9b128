use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::domain::UnknownVariant;

/// Zoning outcome for one plot area / road width pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarResult {
    pub plot_area_sqft: f64,
    pub road_width_ft: f64,
    pub zone_type: String,
    /// Name of the rule table that produced the result
    pub rule_table: String,
    pub calculated_far: f64,
    pub min_far: f64,
    pub max_far: f64,
    pub base_far: f64,
    pub premium_available: bool,
    pub total_buildable_area_sqft: f64,
}

/// Persisted FAR calculation. The newest record per plot is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarRecord {
    pub id: Uuid,
    pub plot_id: Uuid,
    #[serde(flatten)]
    pub result: FarResult,
    pub created_at: DateTime<Utc>,
}

/// Setback tier, keyed by plot area in square meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotCategory {
    #[serde(rename = "≤60 sq m")]
    UpTo60,
    #[serde(rename = "60-150 sq m")]
    From60To150,
    #[serde(rename = "150-250 sq m")]
    From150To250,
    #[serde(rename = "250-4000 sq m")]
    From250To4000,
    #[serde(rename = ">4000 sq m")]
    Above4000,
}

impl PlotCategory {
    pub fn label(&self) -> &'static str {
        match self {
            PlotCategory::UpTo60 => "≤60 sq m",
            PlotCategory::From60To150 => "60-150 sq m",
            PlotCategory::From150To250 => "150-250 sq m",
            PlotCategory::From250To4000 => "250-4000 sq m",
            PlotCategory::Above4000 => ">4000 sq m",
        }
    }
}

impl fmt::Display for PlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlotCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            PlotCategory::UpTo60,
            PlotCategory::From60To150,
            PlotCategory::From150To250,
            PlotCategory::From250To4000,
            PlotCategory::Above4000,
        ]
        .into_iter()
        .find(|category| category.label() == s)
        .ok_or_else(|| UnknownVariant {
            kind: "plot category",
            value: s.to_string(),
        })
    }
}

/// Mandatory clearances and the footprint left after applying them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackResult {
    pub plot_category: PlotCategory,
    pub front_setback_m: f64,
    pub rear_setback_m: f64,
    pub side_setback_m: f64,
    pub front_setback_ft: f64,
    pub rear_setback_ft: f64,
    pub side_setback_ft: f64,
    pub net_length_ft: f64,
    pub net_width_ft: f64,
    pub net_buildable_area_sqft: f64,
}

/// Floor count and saleable yield derived from buildable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorYield {
    pub allowed_floors: u32,
    pub number_of_units: u32,
    pub saleable_area_sqft: f64,
    pub average_unit_size_sqft: f64,
}

/// Persisted feasibility summary for a plot. Locked until paid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityReport {
    pub id: Uuid,
    pub plot_id: Uuid,
    pub setbacks: SetbackResult,
    pub allowed_floors: u32,
    pub total_built_up_area_sqft: f64,
    pub saleable_area_sqft: f64,
    pub number_of_units: u32,
    pub is_unlocked: bool,
    pub created_at: DateTime<Utc>,
}
