//! Jointlly engine - project evaluation and matching for a development marketplace
//!
//! Two halves share one rule book:
//! - a zoning and feasibility calculator turning plot geometry into FAR,
//!   setbacks, floors and saleable area
//! - a compatibility scorer ranking professionals against published projects
//!
//! Services sit on top of an [`services::EngineStore`] and are exposed over
//! actix-web by [`routes`].

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_far, calculate_match_score, Matcher, ProjectContext, RuleBook};
pub use crate::error::{EngineError, EngineResult};
pub use crate::models::{FarResult, FeasibilityReport, Match, MatchScore, MatchWeights, Plot, Professional, Project};
