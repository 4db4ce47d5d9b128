// Model exports

/// Implements `as_str`, `Display` and `FromStr` over the upper-case wire labels.
macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($label => Ok($name::$variant),)+
                    _ => Err($crate::models::UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

pub mod domain;
pub mod feasibility;
pub mod matching;
pub mod requests;
pub mod responses;

pub use domain::{
    Capability, PidVerification, Plot, PricingTier, Professional, Project, ProjectIntent,
    ProjectStatus, ProjectType, TrackRecord, UnknownVariant, VerificationStatus,
};
pub use feasibility::{FarRecord, FarResult, FeasibilityReport, FloorYield, PlotCategory, SetbackResult};
pub use matching::{
    rank_matches, IllegalTransition, Match, MatchScore, MatchStatus, MatchWeights, PaymentEvent,
    TransactionStatus, TransactionType,
};
pub use requests::{ComputeFarRequest, FeasibilityRequest, MatchListQuery, PlotFarRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchListResponse, PaymentEventResponse, PublishResponse};
