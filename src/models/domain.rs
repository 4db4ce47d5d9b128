use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Error returned when a stored or submitted enum label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Kind of development a landowner publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    ContractConstruction,
    JvJd,
    Interior,
    Reconstruction,
}

labelled_enum!(ProjectType, "project type", {
    ContractConstruction => "CONTRACT_CONSTRUCTION",
    JvJd => "JV_JD",
    Interior => "INTERIOR",
    Reconstruction => "RECONSTRUCTION",
});

impl ProjectType {
    /// Capability a professional must hold to be a candidate for this project type
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            ProjectType::ContractConstruction => Some(Capability::Construction),
            ProjectType::Interior => Some(Capability::Interior),
            ProjectType::Reconstruction => Some(Capability::Reconstruction),
            ProjectType::JvJd => Some(Capability::JvJd),
        }
    }

    /// Whether publishing requires a verified PID record on the plot
    pub fn requires_verified_pid(&self) -> bool {
        matches!(self, ProjectType::JvJd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectIntent {
    Residential,
    Commercial,
    Industrial,
}

labelled_enum!(ProjectIntent, "project intent", {
    Residential => "RESIDENTIAL",
    Commercial => "COMMERCIAL",
    Industrial => "INDUSTRIAL",
});

/// Project lifecycle. MATCHED and COMPLETED are driven by the outer workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Published,
    Matched,
    Completed,
}

labelled_enum!(ProjectStatus, "project status", {
    Draft => "DRAFT",
    Published => "PUBLISHED",
    Matched => "MATCHED",
    Completed => "COMPLETED",
});

impl ProjectStatus {
    /// A retried publish of an already published project is allowed and re-runs the batch
    pub fn can_publish(&self) -> bool {
        matches!(self, ProjectStatus::Draft | ProjectStatus::Published)
    }
}

/// Service category a professional declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Construction,
    Interior,
    JvJd,
    Reconstruction,
}

labelled_enum!(Capability, "capability", {
    Construction => "CONSTRUCTION",
    Interior => "INTERIOR",
    JvJd => "JV_JD",
    Reconstruction => "RECONSTRUCTION",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed,
}

labelled_enum!(VerificationStatus, "verification status", {
    Pending => "PENDING",
    Verified => "VERIFIED",
    Failed => "FAILED",
});

/// Plot geometry and the municipal record fields attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: Uuid,
    pub city: String,
    #[serde(default)]
    pub width_ft: f64,
    #[serde(default)]
    pub length_ft: f64,
    #[serde(default)]
    pub road_width_ft: f64,
    #[serde(default)]
    pub facing: Option<String>,
    #[serde(default)]
    pub is_corner: bool,
    #[serde(default)]
    pub pid_number: Option<String>,
    #[serde(default)]
    pub tax_paid: bool,
    #[serde(default)]
    pub e_khatha_status: Option<String>,
}

impl Plot {
    /// Plot area in square feet. Non-positive dimensions give zero area.
    pub fn area_sqft(&self) -> f64 {
        if self.width_ft > 0.0 && self.length_ft > 0.0 {
            self.width_ft * self.length_ft
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub plot_id: Uuid,
    pub project_type: ProjectType,
    #[serde(default)]
    pub intent: Option<ProjectIntent>,
    #[serde(default)]
    pub status: ProjectStatus,
}

/// Municipal PID lookup recorded against a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PidVerification {
    pub id: Uuid,
    pub plot_id: Uuid,
    pub pid_number: String,
    #[serde(default)]
    pub e_khatha_status: Option<String>,
    pub status: VerificationStatus,
}

/// Price band a professional quotes for one capability.
/// Missing bounds are open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub capability: Capability,
    #[serde(default)]
    pub min_area_sqft: Option<f64>,
    #[serde(default)]
    pub max_area_sqft: Option<f64>,
    pub price_per_sqft: f64,
    #[serde(default)]
    pub tier_name: Option<String>,
}

impl PricingTier {
    /// Whether the band covers the given area. Inverted bands cover nothing.
    pub fn contains(&self, area_sqft: f64) -> bool {
        let min = self.min_area_sqft.unwrap_or(f64::NEG_INFINITY);
        let max = self.max_area_sqft.unwrap_or(f64::INFINITY);
        min <= area_sqft && area_sqft <= max
    }

    /// Reason the tier is malformed, if it is
    pub fn bounds_error(&self) -> Option<String> {
        if !self.price_per_sqft.is_finite() || self.price_per_sqft < 0.0 {
            return Some(format!(
                "price_per_sqft must be a non-negative number, got {}",
                self.price_per_sqft
            ));
        }
        for bound in [self.min_area_sqft, self.max_area_sqft].into_iter().flatten() {
            if !bound.is_finite() || bound < 0.0 {
                return Some(format!("area bounds must be non-negative numbers, got {}", bound));
            }
        }
        match (self.min_area_sqft, self.max_area_sqft) {
            (Some(min), Some(max)) if min > max => Some(format!(
                "min_area_sqft {} exceeds max_area_sqft {}",
                min, max
            )),
            _ => None,
        }
    }
}

/// Credentials and history a professional has on record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackRecord {
    pub license_count: u32,
    pub portfolio_count: u32,
    pub rera_registered: bool,
    pub experience_years: u32,
    pub projects_completed: u32,
    pub office_address: Option<String>,
}

/// Registered service professional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professional {
    pub id: Uuid,
    pub company_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
    #[serde(default)]
    pub location_preferences: Vec<String>,
    #[serde(default)]
    pub track_record: TrackRecord,
    /// Computed on registration; any submitted value is replaced
    #[serde(default)]
    pub credibility_score: f64,
}

impl Professional {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Pricing tiers declared for one capability
    pub fn tiers_for(&self, capability: Capability) -> impl Iterator<Item = &PricingTier> {
        self.pricing_tiers
            .iter()
            .filter(move |tier| tier.capability == capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(width_ft: f64, length_ft: f64) -> Plot {
        Plot {
            id: Uuid::new_v4(),
            city: "Bengaluru".to_string(),
            width_ft,
            length_ft,
            road_width_ft: 30.0,
            facing: None,
            is_corner: false,
            pid_number: None,
            tax_paid: false,
            e_khatha_status: None,
        }
    }

    #[test]
    fn test_plot_area() {
        assert_eq!(plot(40.0, 60.0).area_sqft(), 2400.0);
        assert_eq!(plot(0.0, 60.0).area_sqft(), 0.0);
        assert_eq!(plot(-10.0, 60.0).area_sqft(), 0.0);
    }

    #[test]
    fn test_project_type_mapping() {
        assert_eq!(
            ProjectType::ContractConstruction.required_capability(),
            Some(Capability::Construction)
        );
        assert_eq!(ProjectType::JvJd.required_capability(), Some(Capability::JvJd));
        assert!(ProjectType::JvJd.requires_verified_pid());
        assert!(!ProjectType::Interior.requires_verified_pid());
    }

    #[test]
    fn test_labels_round_trip() {
        for capability in Capability::ALL {
            assert_eq!(capability.as_str().parse::<Capability>().unwrap(), *capability);
        }
        assert_eq!("jv_jd".parse::<ProjectType>().unwrap(), ProjectType::JvJd);
        assert!("villa".parse::<ProjectType>().is_err());
    }

    #[test]
    fn test_pricing_tier_bounds() {
        let open = PricingTier {
            capability: Capability::Construction,
            min_area_sqft: None,
            max_area_sqft: Some(5000.0),
            price_per_sqft: 2000.0,
            tier_name: None,
        };
        assert!(open.contains(0.0));
        assert!(open.contains(5000.0));
        assert!(!open.contains(5000.5));
        assert!(open.bounds_error().is_none());

        let inverted = PricingTier {
            min_area_sqft: Some(6000.0),
            ..open.clone()
        };
        assert!(!inverted.contains(5500.0));
        assert!(inverted.bounds_error().is_some());

        let negative_price = PricingTier {
            price_per_sqft: -1.0,
            ..open
        };
        assert!(negative_price.bounds_error().is_some());
    }
}
