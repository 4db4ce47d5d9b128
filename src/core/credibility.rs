use crate::models::Professional;

/// Weight of each credibility factor. The weights sum to 1.0.
pub const COMPANY_WEIGHT: f64 = 0.20;
pub const LICENSE_WEIGHT: f64 = 0.15;
pub const RERA_WEIGHT: f64 = 0.10;
pub const PORTFOLIO_WEIGHT: f64 = 0.20;
pub const EXPERIENCE_WEIGHT: f64 = 0.15;
pub const PROJECTS_WEIGHT: f64 = 0.10;
pub const ADDRESS_WEIGHT: f64 = 0.10;

/// Counts at which a factor saturates at 1.0
const FULL_LICENSES: f64 = 2.0;
const FULL_PORTFOLIO: f64 = 3.0;
const FULL_EXPERIENCE_YEARS: f64 = 10.0;
const FULL_PROJECTS: f64 = 20.0;

/// Per-factor credibility scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibilityBreakdown {
    pub company: f64,
    pub license: f64,
    pub rera: f64,
    pub portfolio: f64,
    pub experience: f64,
    pub projects: f64,
    pub address: f64,
}

impl CredibilityBreakdown {
    /// Weighted total, rounded to 4 decimal places
    pub fn total(&self) -> f64 {
        let total = self.company * COMPANY_WEIGHT
            + self.license * LICENSE_WEIGHT
            + self.rera * RERA_WEIGHT
            + self.portfolio * PORTFOLIO_WEIGHT
            + self.experience * EXPERIENCE_WEIGHT
            + self.projects * PROJECTS_WEIGHT
            + self.address * ADDRESS_WEIGHT;
        (total * 10_000.0).round() / 10_000.0
    }
}

fn present(value: Option<&str>) -> f64 {
    match value {
        Some(v) if !v.trim().is_empty() => 1.0,
        _ => 0.0,
    }
}

fn saturating(count: u32, full: f64) -> f64 {
    (f64::from(count) / full).min(1.0)
}

/// Score each factor from what the professional has on record.
///
/// Company and address count when present; nothing is checked against an
/// outside registry.
pub fn credibility_breakdown(professional: &Professional) -> CredibilityBreakdown {
    let record = &professional.track_record;
    CredibilityBreakdown {
        company: present(Some(professional.company_name.as_str())),
        license: saturating(record.license_count, FULL_LICENSES),
        rera: if record.rera_registered { 1.0 } else { 0.0 },
        portfolio: saturating(record.portfolio_count, FULL_PORTFOLIO),
        experience: saturating(record.experience_years, FULL_EXPERIENCE_YEARS),
        projects: saturating(record.projects_completed, FULL_PROJECTS),
        address: present(record.office_address.as_deref()),
    }
}

/// Credibility score of a professional in [0, 1]
pub fn credibility_score(professional: &Professional) -> f64 {
    credibility_breakdown(professional).total()
}
