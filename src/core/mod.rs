// Core algorithm exports
pub mod credibility;
pub mod far;
pub mod feasibility;
pub mod floors;
pub mod matcher;
pub mod rules;
pub mod scoring;
pub mod setback;

pub use credibility::{credibility_breakdown, credibility_score, CredibilityBreakdown};
pub use far::calculate_far;
pub use feasibility::{assess_plot, FeasibilityAssessment};
pub use floors::calculate_floor_yield;
pub use matcher::{Matcher, ScoredCandidate};
pub use rules::RuleBook;
pub use scoring::{calculate_match_score, ProjectContext};
pub use setback::calculate_setbacks;
