use crate::core::rules::YieldAssumptions;
use crate::models::{FloorYield, ProjectType};

/// Derive floor count, unit count and saleable area.
///
/// Floors are how many net footprints fit into the buildable area, capped at
/// `max_floors`. Units assume a fixed average size and saleable area a fixed
/// efficiency. The project type is accepted but does not change the figures.
pub fn calculate_floor_yield(
    assumptions: &YieldAssumptions,
    net_buildable_area_sqft: f64,
    total_buildable_area_sqft: f64,
    _project_type: Option<ProjectType>,
) -> FloorYield {
    let total = if total_buildable_area_sqft.is_finite() && total_buildable_area_sqft > 0.0 {
        total_buildable_area_sqft
    } else {
        0.0
    };

    let allowed_floors = if net_buildable_area_sqft > 0.0 {
        ((total / net_buildable_area_sqft).floor() as u32).min(assumptions.max_floors)
    } else {
        0
    };

    let number_of_units = if assumptions.average_unit_size_sqft > 0.0 {
        (total / assumptions.average_unit_size_sqft).floor() as u32
    } else {
        0
    };

    FloorYield {
        allowed_floors,
        number_of_units,
        saleable_area_sqft: total * assumptions.saleable_efficiency,
        average_unit_size_sqft: assumptions.average_unit_size_sqft,
    }
}
