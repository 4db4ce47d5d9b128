use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::credibility::credibility_score;
use crate::core::matcher::Matcher;
use crate::core::scoring::ProjectContext;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    rank_matches, Match, MatchStatus, Professional, Project, ProjectStatus, PublishResponse,
    VerificationStatus,
};
use crate::services::cache::{CacheKey, MatchCache};
use crate::services::store::{EngineStore, StoreError};

/// Project publishing, match batches and match reads
///
/// Pipeline for a publish:
/// 1. Gate on project status and, for JV/JD, a verified PID
/// 2. Gather the project context (plot, PID records, latest report)
/// 3. Query professionals holding the required capability
/// 4. Skip pairs that already have a match
/// 5. Score the rest and persist them as PENDING matches
#[derive(Clone)]
pub struct MatchingService {
    store: Arc<dyn EngineStore>,
    matcher: Matcher,
    cache: MatchCache,
    max_limit: usize,
}

impl MatchingService {
    pub fn new(
        store: Arc<dyn EngineStore>,
        matcher: Matcher,
        cache: MatchCache,
        max_limit: usize,
    ) -> Self {
        Self {
            store,
            matcher,
            cache,
            max_limit: max_limit.max(1),
        }
    }

    /// Validate and store a professional with a freshly computed credibility score
    pub async fn register_professional(&self, mut professional: Professional) -> EngineResult<Professional> {
        if professional.company_name.trim().is_empty() {
            return Err(EngineError::validation("company_name must not be empty"));
        }
        if let Some(reason) = professional
            .pricing_tiers
            .iter()
            .find_map(|tier| tier.bounds_error())
        {
            return Err(EngineError::validation(format!("invalid pricing tier: {}", reason)));
        }

        professional.credibility_score = credibility_score(&professional);
        self.store.upsert_professional(&professional).await?;
        tracing::info!(
            "Registered professional {} with {} capabilities (credibility {:.4})",
            professional.id,
            professional.capabilities.len(),
            professional.credibility_score
        );
        Ok(professional)
    }

    pub async fn get_professional(&self, professional_id: Uuid) -> EngineResult<Professional> {
        self.store
            .get_professional(professional_id)
            .await?
            .ok_or_else(|| EngineError::not_found("professional", professional_id))
    }

    /// Create a project or update an existing one's details.
    ///
    /// New projects start as DRAFT. The status of an existing project is kept;
    /// only publishing and the outer workflow move it.
    pub async fn register_project(&self, mut project: Project) -> EngineResult<Project> {
        if self.store.get_plot(project.plot_id).await?.is_none() {
            return Err(EngineError::not_found("plot", project.plot_id));
        }

        match self.store.get_project(project.id).await? {
            None if project.status != ProjectStatus::Draft => {
                return Err(EngineError::validation(format!(
                    "new projects start as {}, got {}",
                    ProjectStatus::Draft,
                    project.status
                )));
            }
            None => {}
            Some(existing)
                if project.status != existing.status && project.status != ProjectStatus::Draft =>
            {
                return Err(EngineError::validation(format!(
                    "project {} is {}; registration cannot move it to {}",
                    project.id, existing.status, project.status
                )));
            }
            Some(existing) => project.status = existing.status,
        }

        self.store.upsert_project(&project).await?;
        tracing::info!(
            "Registered {} project {} on plot {}",
            project.project_type,
            project.id,
            project.plot_id
        );
        Ok(project)
    }

    pub async fn get_project(&self, project_id: Uuid) -> EngineResult<Project> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| EngineError::not_found("project", project_id))
    }

    /// Publish a project and run its match batch.
    ///
    /// Publishing an already published project re-runs the batch, which only
    /// adds pairs that do not exist yet.
    pub async fn publish_and_match(&self, project_id: Uuid) -> EngineResult<PublishResponse> {
        let mut project = self.get_project(project_id).await?;

        if !project.status.can_publish() {
            return Err(EngineError::validation(format!(
                "project {} is {} and cannot be published",
                project_id, project.status
            )));
        }

        if project.project_type.requires_verified_pid() {
            let verified = self
                .store
                .pid_verifications_for_plot(project.plot_id)
                .await?
                .iter()
                .any(|v| v.status == VerificationStatus::Verified);
            if !verified {
                return Err(EngineError::validation(format!(
                    "{} projects require a verified PID for plot {}",
                    project.project_type, project.plot_id
                )));
            }
        }

        if project.status != ProjectStatus::Published {
            self.store
                .set_project_status(project_id, ProjectStatus::Published)
                .await?;
            project.status = ProjectStatus::Published;
            tracing::info!("Published project {}", project_id);
        }

        let created = self.score_and_batch(&project).await?;

        Ok(PublishResponse { project, created })
    }

    /// Score every capable professional not yet paired with the project and
    /// persist the new pairs. Existing pairs keep their stored scores.
    pub async fn score_and_batch(&self, project: &Project) -> EngineResult<Vec<Match>> {
        let context = self.project_context(project).await?;

        let candidates = self
            .store
            .professionals_with_capability(context.required_capability())
            .await?;
        let total_candidates = candidates.len();

        let existing: HashSet<Uuid> = self
            .store
            .matched_professionals(project.id)
            .await?
            .into_iter()
            .collect();

        let fresh: Vec<Professional> = candidates
            .into_iter()
            .filter(|p| !existing.contains(&p.id))
            .collect();

        let mut created = Vec::with_capacity(fresh.len());
        for scored in self.matcher.score_candidates(&context, fresh) {
            let record = Match::pending(project.id, scored.professional.id, scored.score);
            match self.store.insert_match(&record).await {
                Ok(()) => {
                    self.cache
                        .invalidate(&CacheKey::professional_matches(record.professional_id))
                        .await;
                    created.push(record);
                }
                Err(StoreError::Conflict { professional_id, .. }) => {
                    tracing::debug!(
                        "Match for project {} and professional {} already exists",
                        project.id,
                        professional_id
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        self.cache
            .invalidate(&CacheKey::project_matches(project.id))
            .await;

        tracing::info!(
            "Match batch for project {}: {} created from {} candidates ({} already paired)",
            project.id,
            created.len(),
            total_candidates,
            existing.len()
        );

        Ok(created)
    }

    /// Recompute and overwrite the scores of every existing pair of the project
    pub async fn refresh_scores(&self, project_id: Uuid) -> EngineResult<Vec<Match>> {
        let project = self.get_project(project_id).await?;
        let context = self.project_context(&project).await?;

        let mut matches = self.store.matches_for_project(project_id, usize::MAX).await?;
        for record in matches.iter_mut() {
            let Some(professional) = self.store.get_professional(record.professional_id).await? else {
                tracing::warn!(
                    "Professional {} of match {} no longer exists, keeping stored score",
                    record.professional_id,
                    record.id
                );
                continue;
            };

            let score = self.matcher.score(&context, &professional);
            if score != record.score {
                self.store.update_match_score(record.id, &score).await?;
                record.score = score;
            }
            self.cache
                .invalidate(&CacheKey::professional_matches(record.professional_id))
                .await;
        }
        self.cache
            .invalidate(&CacheKey::project_matches(project_id))
            .await;

        rank_matches(&mut matches);
        tracing::info!("Refreshed {} match scores for project {}", matches.len(), project_id);
        Ok(matches)
    }

    /// Matches of a project, best first
    pub async fn project_matches(&self, project_id: Uuid, limit: usize) -> EngineResult<Vec<Match>> {
        self.get_project(project_id).await?;
        let key = CacheKey::project_matches(project_id);
        let limit = limit.min(self.max_limit);

        if let Some(matches) = self.cache.get(&key, limit).await {
            return Ok(matches);
        }

        let generation = self.cache.generation();
        let ranked = self
            .store
            .matches_for_project(project_id, self.max_limit)
            .await?;
        Ok(self.cache_and_truncate(key, ranked, generation, limit).await)
    }

    /// Matches of a professional, best first
    pub async fn professional_matches(
        &self,
        professional_id: Uuid,
        limit: usize,
    ) -> EngineResult<Vec<Match>> {
        self.get_professional(professional_id).await?;
        let key = CacheKey::professional_matches(professional_id);
        let limit = limit.min(self.max_limit);

        if let Some(matches) = self.cache.get(&key, limit).await {
            return Ok(matches);
        }

        let generation = self.cache.generation();
        let ranked = self
            .store
            .matches_for_professional(professional_id, self.max_limit)
            .await?;
        Ok(self.cache_and_truncate(key, ranked, generation, limit).await)
    }

    pub async fn accept_match(&self, match_id: Uuid) -> EngineResult<Match> {
        self.transition_match(match_id, MatchStatus::Accepted).await
    }

    pub async fn reject_match(&self, match_id: Uuid) -> EngineResult<Match> {
        self.transition_match(match_id, MatchStatus::Rejected).await
    }

    async fn transition_match(&self, match_id: Uuid, to: MatchStatus) -> EngineResult<Match> {
        let mut record = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;

        let next = record.status.transition(to)?;
        if next == record.status {
            return Ok(record);
        }

        self.store.set_match_status(match_id, next).await?;
        self.cache
            .invalidate_pair(record.project_id, record.professional_id)
            .await;

        tracing::info!("Match {} moved from {} to {}", match_id, record.status, next);

        // Re-read to pick up the store's updated_at
        record = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| EngineError::not_found("match", match_id))?;
        Ok(record)
    }

    async fn project_context(&self, project: &Project) -> EngineResult<ProjectContext> {
        let plot = self
            .store
            .get_plot(project.plot_id)
            .await?
            .ok_or_else(|| EngineError::not_found("plot", project.plot_id))?;
        let verifications = self.store.pid_verifications_for_plot(plot.id).await?;
        let latest_report = self.store.latest_report(plot.id).await?;

        Ok(ProjectContext::new(
            project.clone(),
            plot,
            verifications,
            latest_report.as_ref(),
        ))
    }

    async fn cache_and_truncate(
        &self,
        key: String,
        mut ranked: Vec<Match>,
        generation: u64,
        limit: usize,
    ) -> Vec<Match> {
        self.cache.fill(key, ranked.clone(), generation).await;
        ranked.truncate(limit);
        ranked
    }
}
