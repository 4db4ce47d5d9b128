use crate::core::rules::{FarRules, DEFAULT_ZONE_TYPE};
use crate::models::FarResult;

/// Calculate the floor-area ratio and total buildable area for a plot.
///
/// The road width selects a band of the city's table (unknown cities use the
/// default table). The base FAR is applied; the premium ratio is only
/// reported through `premium_available`. Never fails: a non-positive plot
/// area yields zero buildable area.
pub fn calculate_far(
    rules: &FarRules,
    plot_area_sqft: f64,
    road_width_ft: f64,
    zone_type: Option<&str>,
    city: Option<&str>,
) -> FarResult {
    let table = rules.table_for(city);
    let ratio = table.ratio_for(road_width_ft);

    let plot_area_sqft = sanitize_area(plot_area_sqft);
    let calculated_far = ratio.base_far;

    let zone_type = zone_type
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .unwrap_or(DEFAULT_ZONE_TYPE)
        .to_string();

    FarResult {
        plot_area_sqft,
        road_width_ft,
        zone_type,
        rule_table: table.name.clone(),
        calculated_far,
        min_far: table.min_far,
        max_far: ratio.max_far,
        base_far: ratio.base_far,
        premium_available: ratio.max_far > ratio.base_far,
        total_buildable_area_sqft: plot_area_sqft * calculated_far,
    }
}

/// Negative, zero and non-finite areas all collapse to zero
#[inline]
pub(crate) fn sanitize_area(area_sqft: f64) -> f64 {
    if area_sqft.is_finite() && area_sqft > 0.0 {
        area_sqft
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_for_35ft_road() {
        let result = calculate_far(&FarRules::default(), 1200.0, 35.0, None, None);

        assert_eq!(result.calculated_far, 2.0);
        assert_eq!(result.total_buildable_area_sqft, 2400.0);
        assert_eq!(result.zone_type, "Residential");
        assert_eq!(result.min_far, 1.5);
        assert!(result.premium_available);
    }

    #[test]
    fn test_far_tier_boundaries() {
        let rules = FarRules::default();
        let cases = [
            (0.0, 1.5),
            (29.9, 1.5),
            (30.0, 2.0),
            (39.9, 2.0),
            (40.0, 2.5),
            (59.9, 2.5),
            (60.0, 3.0),
            (120.0, 3.0),
        ];
        for (road_width, expected) in cases {
            let result = calculate_far(&rules, 1000.0, road_width, None, None);
            assert_eq!(result.calculated_far, expected, "road width {}", road_width);
        }
    }

    #[test]
    fn test_far_is_monotonic_in_road_width() {
        let rules = FarRules::default();
        let mut previous = 0.0;
        for step in 0..200 {
            let far = calculate_far(&rules, 1000.0, step as f64 * 0.5, None, None).calculated_far;
            assert!(far >= previous);
            previous = far;
        }
    }

    #[test]
    fn test_degenerate_plot_area() {
        let rules = FarRules::default();
        assert_eq!(calculate_far(&rules, 0.0, 45.0, None, None).total_buildable_area_sqft, 0.0);
        assert_eq!(calculate_far(&rules, -50.0, 45.0, None, None).total_buildable_area_sqft, 0.0);
    }

    #[test]
    fn test_zone_and_city_defaults() {
        let rules = FarRules::default();
        let result = calculate_far(&rules, 1000.0, 70.0, Some("Commercial"), Some("Atlantis"));

        assert_eq!(result.zone_type, "Commercial");
        assert_eq!(result.rule_table, "default");
        assert_eq!(result.max_far, 3.25);

        let blank_zone = calculate_far(&rules, 1000.0, 70.0, Some("  "), None);
        assert_eq!(blank_zone.zone_type, "Residential");
    }
}
