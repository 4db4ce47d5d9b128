use crate::core::far::sanitize_area;
use crate::core::rules::{SetbackRule, SetbackRules, FEET_PER_METER, SQFT_PER_SQM};
use crate::models::SetbackResult;

/// Calculate setbacks and the net buildable footprint of a plot.
///
/// The tier is picked from the plot area in square meters. Length is taken as
/// the depth (front to rear) and width as the road-facing side. Net
/// dimensions are floored at zero so a plot smaller than its clearances
/// has no footprint rather than a negative one.
///
/// `facing` is accepted for corner-plot handling but does not change the result.
pub fn calculate_setbacks(
    rules: &SetbackRules,
    plot_area_sqft: f64,
    width_ft: f64,
    length_ft: f64,
    _facing: Option<&str>,
) -> SetbackResult {
    let area_sqm = sanitize_area(plot_area_sqft) / SQFT_PER_SQM;
    let width_ft = sanitize_area(width_ft);
    let length_ft = sanitize_area(length_ft);

    let (plot_category, rule) = rules.tier_for(area_sqm);

    // Fixed tiers are defined in meters, proportional tiers in feet
    let [front_m, rear_m, side_m] = match rule {
        SetbackRule::Fixed { front_m, rear_m, side_m } => [front_m, rear_m, side_m],
        SetbackRule::Proportional { front_pct, rear_pct, side_pct } => {
            let depth_ft = width_ft.max(length_ft);
            let short_side_ft = width_ft.min(length_ft);
            [depth_ft * front_pct, depth_ft * rear_pct, short_side_ft * side_pct]
                .map(|ft| ft / FEET_PER_METER)
        }
    };
    let [front_ft, rear_ft, side_ft] = [front_m, rear_m, side_m].map(|m| m * FEET_PER_METER);

    let net_length_ft = (length_ft - (front_ft + rear_ft)).max(0.0);
    let net_width_ft = (width_ft - 2.0 * side_ft).max(0.0);

    SetbackResult {
        plot_category,
        front_setback_m: front_m,
        rear_setback_m: rear_m,
        side_setback_m: side_m,
        front_setback_ft: front_ft,
        rear_setback_ft: rear_ft,
        side_setback_ft: side_ft,
        net_length_ft,
        net_width_ft,
        net_buildable_area_sqft: net_length_ft * net_width_ft,
    }
}
