use crate::core::rules::PriceBand;
use crate::models::{
    Capability, FeasibilityReport, MatchScore, MatchWeights, PidVerification, Plot, Professional,
    Project, VerificationStatus,
};

/// Neutral score used when a signal has nothing to judge
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Location score when preferences exist but none covers the city
pub const LOCATION_MISS_SCORE: f64 = 0.3;

/// Everything the scorer needs to know about the project side of a pair.
///
/// Gathered once per batch by the caller through read-only store queries, so
/// scoring itself never touches storage.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    pub plot: Plot,
    pub pid_verifications: Vec<PidVerification>,
    pub project_area_sqft: f64,
}

impl ProjectContext {
    pub fn new(
        project: Project,
        plot: Plot,
        pid_verifications: Vec<PidVerification>,
        latest_report: Option<&FeasibilityReport>,
    ) -> Self {
        let project_area_sqft = project_area_sqft(&plot, latest_report);
        Self {
            project,
            plot,
            pid_verifications,
            project_area_sqft,
        }
    }

    pub fn required_capability(&self) -> Option<Capability> {
        self.project.project_type.required_capability()
    }
}

/// Area used for size and pricing compatibility: the built-up area of the
/// latest feasibility report when there is one, the plot area otherwise.
pub fn project_area_sqft(plot: &Plot, latest_report: Option<&FeasibilityReport>) -> f64 {
    match latest_report {
        Some(report) if report.total_built_up_area_sqft > 0.0 => report.total_built_up_area_sqft,
        _ => plot.area_sqft(),
    }
}

/// Calculate the compatibility score for one project/professional pair
///
/// Scoring formula:
/// total = (
///     project_type * 0.20 +     # holds the capability the project type needs
///     location * 0.25 +         # city covered by a location preference
///     project_size * 0.15 +     # a pricing tier covers the project area
///     pricing * 0.15 +          # cheaper quotes score higher
///     capability * 0.15 +       # same check as project_type, separate weight
///     verification * 0.10       # PID / tax / e-khatha checklist
/// )
pub fn calculate_match_score(
    context: &ProjectContext,
    professional: &Professional,
    weights: &MatchWeights,
    price_band: &PriceBand,
) -> MatchScore {
    let required = context.required_capability();

    let project_type_score = calculate_project_type_score(required, professional);
    let location_score =
        calculate_location_score(&context.plot.city, &professional.location_preferences);
    let project_size_score =
        calculate_project_size_score(context.project_area_sqft, professional, required);
    let pricing_score =
        calculate_pricing_score(context.project_area_sqft, professional, required, price_band);
    let capability_score = calculate_capability_score(required, professional);
    let verification_score =
        calculate_verification_score(&context.plot, &context.pid_verifications);

    let total_score = project_type_score * weights.project_type
        + location_score * weights.location
        + project_size_score * weights.project_size
        + pricing_score * weights.pricing
        + capability_score * weights.capability
        + verification_score * weights.verification;

    MatchScore {
        project_type_score,
        location_score,
        project_size_score,
        pricing_score,
        capability_score,
        verification_score,
        total_score,
    }
}

/// 1.0 when the professional holds the capability the project type maps to
pub fn calculate_project_type_score(
    required: Option<Capability>,
    professional: &Professional,
) -> f64 {
    match required {
        Some(capability) if professional.has_capability(capability) => 1.0,
        _ => 0.0,
    }
}

/// Identical check to [`calculate_project_type_score`], kept as its own
/// signal because it carries its own weight.
pub fn calculate_capability_score(required: Option<Capability>, professional: &Professional) -> f64 {
    calculate_project_type_score(required, professional)
}

/// Case-insensitive substring match between the plot city and any
/// preference, in either direction. No preferences is neutral, not a penalty.
pub fn calculate_location_score(city: &str, preferences: &[String]) -> f64 {
    let preferences: Vec<String> = preferences
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    if preferences.is_empty() {
        return NEUTRAL_SCORE;
    }

    let city = city.trim().to_lowercase();
    if preferences
        .iter()
        .any(|pref| pref.contains(city.as_str()) || city.contains(pref.as_str()))
    {
        1.0
    } else {
        LOCATION_MISS_SCORE
    }
}

/// 1.0 when any tier for the required capability covers the project area
pub fn calculate_project_size_score(
    project_area_sqft: f64,
    professional: &Professional,
    required: Option<Capability>,
) -> f64 {
    let covered = required
        .map(|capability| {
            professional
                .tiers_for(capability)
                .any(|tier| tier.contains(project_area_sqft))
        })
        .unwrap_or(false);

    if covered {
        1.0
    } else {
        NEUTRAL_SCORE
    }
}

/// Average quoted price across the applicable tiers, normalised against the
/// competitive band so that cheaper scores higher
pub fn calculate_pricing_score(
    project_area_sqft: f64,
    professional: &Professional,
    required: Option<Capability>,
    band: &PriceBand,
) -> f64 {
    let Some(capability) = required else {
        return NEUTRAL_SCORE;
    };

    let prices: Vec<f64> = professional
        .tiers_for(capability)
        .filter(|tier| tier.contains(project_area_sqft))
        .map(|tier| tier.price_per_sqft)
        .collect();

    if prices.is_empty() {
        return NEUTRAL_SCORE;
    }

    let average = prices.iter().sum::<f64>() / prices.len() as f64;
    let span = band.high_per_sqft - band.low_per_sqft;

    (1.0 - (average - band.low_per_sqft) / span).clamp(0.0, 1.0)
}

/// Additive checklist over the plot's municipal records, capped at 1.0
pub fn calculate_verification_score(plot: &Plot, verifications: &[PidVerification]) -> f64 {
    let mut score = 0.0;

    if verifications
        .iter()
        .any(|v| v.status == VerificationStatus::Verified)
    {
        score += 0.5;
    }
    if plot.pid_number.is_some() {
        score += 0.2;
    }
    if plot.tax_paid {
        score += 0.2;
    }
    if plot.e_khatha_status.is_some() {
        score += 0.1;
    }

    f64::min(score, 1.0)
}
