use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standalone FAR calculation, no plot record involved
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComputeFarRequest {
    pub plot_area_sqft: f64,
    #[validate(range(min = 0.0))]
    pub road_width_ft: f64,
    #[validate(length(min = 1, max = 100))]
    pub zone_type: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
}

/// FAR calculation persisted against a plot.
/// The plot's own road width is used when none is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlotFarRequest {
    #[validate(range(min = 0.0))]
    pub road_width_ft: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub zone_type: Option<String>,
}

/// Feasibility request. Without an explicit total the latest FAR result is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityRequest {
    #[validate(range(min = 0.0))]
    pub total_buildable_area_sqft: Option<f64>,
}

/// Pagination for ranked match reads
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchListQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}
