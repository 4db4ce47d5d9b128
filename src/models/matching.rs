use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Rejected match status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("match cannot move from {from} to {to}")]
pub struct IllegalTransition {
    pub from: MatchStatus,
    pub to: MatchStatus,
}

labelled_enum!(MatchStatus, "match status", {
    Pending => "PENDING",
    Accepted => "ACCEPTED",
    Rejected => "REJECTED",
});

impl MatchStatus {
    /// Apply the transition table.
    ///
    /// PENDING may move to ACCEPTED or REJECTED. Both are terminal; repeating
    /// the current status is a no-op rather than an error.
    pub fn transition(self, to: MatchStatus) -> Result<MatchStatus, IllegalTransition> {
        match (self, to) {
            (from, to) if from == to => Ok(to),
            (MatchStatus::Pending, MatchStatus::Accepted | MatchStatus::Rejected) => Ok(to),
            (from, to) => Err(IllegalTransition { from, to }),
        }
    }
}

/// Per-signal weights of the compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWeights {
    pub project_type: f64,
    pub location: f64,
    pub project_size: f64,
    pub pricing: f64,
    pub capability: f64,
    pub verification: f64,
}

impl MatchWeights {
    pub const DEFAULT: MatchWeights = MatchWeights {
        project_type: 0.20,
        location: 0.25,
        project_size: 0.15,
        pricing: 0.15,
        capability: 0.15,
        verification: 0.10,
    };

    pub fn sum(&self) -> f64 {
        self.project_type
            + self.location
            + self.project_size
            + self.pricing
            + self.capability
            + self.verification
    }

    /// Weights must be non-negative and sum to 1.0
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.project_type,
            self.location,
            self.project_size,
            self.pricing,
            self.capability,
            self.verification,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("match weights must be non-negative: {:?}", self));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(format!("match weights must sum to 1.0, got {}", sum));
        }
        Ok(())
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Score breakdown for one project/professional pair. Every field is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub project_type_score: f64,
    pub location_score: f64,
    pub project_size_score: f64,
    pub pricing_score: f64,
    /// Same check as `project_type_score`, carried under its own weight
    pub capability_score: f64,
    pub verification_score: f64,
    pub total_score: f64,
}

/// Scored pairing of a published project with a professional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub project_id: Uuid,
    pub professional_id: Uuid,
    pub status: MatchStatus,
    pub score: MatchScore,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn pending(project_id: Uuid, professional_id: Uuid, score: MatchScore) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            professional_id,
            status: MatchStatus::Pending,
            score,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Order matches by total score, best first. Ties fall back to creation order.
pub fn rank_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        b.score
            .total_score
            .partial_cmp(&a.score.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.professional_id.cmp(&b.professional_id))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    PidVerification,
    FeasibilityUnlock,
    PriorityListing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

/// Transaction outcome reported by the payment collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    pub transaction_id: Uuid,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

impl PaymentEvent {
    /// Project whose feasibility report this event pays for, if any
    pub fn unlocks_project(&self) -> Option<Uuid> {
        match (self.transaction_type, self.status) {
            (TransactionType::FeasibilityUnlock, TransactionStatus::Success) => self.project_id,
            _ => None,
        }
    }
}
