use std::sync::Arc;

use crate::core::rules::RuleBook;
use crate::core::scoring::{calculate_match_score, ProjectContext};
use crate::models::{MatchScore, Professional};

/// Scores candidate professionals against a project
///
/// Holds the rule book so every pair in a batch is scored against the same
/// weights and price band. Pure: persistence is the caller's job.
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: Arc<RuleBook>,
}

/// A candidate with its score, before it becomes a persisted match
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub professional: Professional,
    pub score: MatchScore,
}

impl Matcher {
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(Arc::new(RuleBook::default()))
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Score one pair
    pub fn score(&self, context: &ProjectContext, professional: &Professional) -> MatchScore {
        calculate_match_score(
            context,
            professional,
            &self.rules.weights,
            &self.rules.price_band,
        )
    }

    /// Score every candidate and order them best first
    pub fn score_candidates(
        &self,
        context: &ProjectContext,
        candidates: Vec<Professional>,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|professional| {
                let score = self.score(context, &professional);
                ScoredCandidate { professional, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.professional.id.cmp(&b.professional.id))
        });

        scored
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
