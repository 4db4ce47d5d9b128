use serde::{Deserialize, Serialize};

use crate::models::domain::Project;
use crate::models::feasibility::FeasibilityReport;
use crate::models::matching::Match;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Ranked matches for a project or a professional
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub total_results: usize,
}

/// Outcome of publishing a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub project: Project,
    /// Matches created by this run; pairs that already existed are not repeated
    pub created: Vec<Match>,
}

/// Outcome of a payment collaborator callback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEventResponse {
    pub applied: bool,
    pub report: Option<FeasibilityReport>,
}
