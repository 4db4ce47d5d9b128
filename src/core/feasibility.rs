use crate::core::floors::calculate_floor_yield;
use crate::core::rules::RuleBook;
use crate::core::setback::calculate_setbacks;
use crate::models::{FloorYield, Plot, ProjectType, SetbackResult};

/// Setbacks and yield for one plot, before it is persisted as a report
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityAssessment {
    pub setbacks: SetbackResult,
    pub floors: FloorYield,
    pub total_built_up_area_sqft: f64,
}

/// Run the setback calculator on the plot geometry, then the floor and
/// yield calculator on the resulting footprint.
pub fn assess_plot(
    rules: &RuleBook,
    plot: &Plot,
    total_buildable_area_sqft: f64,
    project_type: Option<ProjectType>,
) -> FeasibilityAssessment {
    let setbacks = calculate_setbacks(
        &rules.setbacks,
        plot.area_sqft(),
        plot.width_ft,
        plot.length_ft,
        plot.facing.as_deref(),
    );

    let floors = calculate_floor_yield(
        &rules.yields,
        setbacks.net_buildable_area_sqft,
        total_buildable_area_sqft,
        project_type,
    );

    FeasibilityAssessment {
        setbacks,
        floors,
        total_built_up_area_sqft: total_buildable_area_sqft,
    }
}
