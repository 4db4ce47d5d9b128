use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    rank_matches, Capability, FarRecord, FeasibilityReport, Match, MatchScore, MatchStatus,
    PidVerification, Plot, Professional, Project, ProjectStatus,
};
use crate::services::store::{EngineStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    plots: HashMap<Uuid, Plot>,
    far_records: Vec<FarRecord>,
    reports: Vec<FeasibilityReport>,
    pid_verifications: HashMap<Uuid, PidVerification>,
    projects: HashMap<Uuid, Project>,
    professionals: HashMap<Uuid, Professional>,
    matches: HashMap<Uuid, Match>,
    /// (project_id, professional_id) -> match id
    pairs: HashMap<(Uuid, Uuid), Uuid>,
}

/// In-process store for tests and single-node runs.
///
/// All state sits behind one lock, so the pair check and the insert in
/// [`EngineStore::insert_match`] happen atomically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ranked(mut matches: Vec<Match>, limit: usize) -> Vec<Match> {
    rank_matches(&mut matches);
    matches.truncate(limit);
    matches
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn upsert_plot(&self, plot: &Plot) -> StoreResult<()> {
        self.state.lock().await.plots.insert(plot.id, plot.clone());
        Ok(())
    }

    async fn get_plot(&self, id: Uuid) -> StoreResult<Option<Plot>> {
        Ok(self.state.lock().await.plots.get(&id).cloned())
    }

    async fn insert_far_record(&self, record: &FarRecord) -> StoreResult<()> {
        self.state.lock().await.far_records.push(record.clone());
        Ok(())
    }

    async fn latest_far_record(&self, plot_id: Uuid) -> StoreResult<Option<FarRecord>> {
        let state = self.state.lock().await;
        // Later inserts win ties on timestamp
        Ok(state
            .far_records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.plot_id == plot_id)
            .max_by_key(|(i, r)| (r.created_at, *i))
            .map(|(_, r)| r.clone()))
    }

    async fn insert_report(&self, report: &FeasibilityReport) -> StoreResult<()> {
        self.state.lock().await.reports.push(report.clone());
        Ok(())
    }

    async fn latest_report(&self, plot_id: Uuid) -> StoreResult<Option<FeasibilityReport>> {
        let state = self.state.lock().await;
        Ok(state
            .reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.plot_id == plot_id)
            .max_by_key(|(i, r)| (r.created_at, *i))
            .map(|(_, r)| r.clone()))
    }

    async fn set_report_unlocked(&self, report_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(report) = state.reports.iter_mut().find(|r| r.id == report_id) {
            report.is_unlocked = true;
        }
        Ok(())
    }

    async fn upsert_pid_verification(&self, verification: &PidVerification) -> StoreResult<()> {
        self.state
            .lock()
            .await
            .pid_verifications
            .insert(verification.id, verification.clone());
        Ok(())
    }

    async fn pid_verifications_for_plot(&self, plot_id: Uuid) -> StoreResult<Vec<PidVerification>> {
        let state = self.state.lock().await;
        Ok(state
            .pid_verifications
            .values()
            .filter(|v| v.plot_id == plot_id)
            .cloned()
            .collect())
    }

    async fn upsert_project(&self, project: &Project) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let mut project = project.clone();
        // Status only moves through set_project_status
        if let Some(existing) = state.projects.get(&project.id) {
            project.status = existing.status;
        }
        state.projects.insert(project.id, project);
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        if let Some(project) = self.state.lock().await.projects.get_mut(&id) {
            project.status = status;
        }
        Ok(())
    }

    async fn upsert_professional(&self, professional: &Professional) -> StoreResult<()> {
        self.state
            .lock()
            .await
            .professionals
            .insert(professional.id, professional.clone());
        Ok(())
    }

    async fn get_professional(&self, id: Uuid) -> StoreResult<Option<Professional>> {
        Ok(self.state.lock().await.professionals.get(&id).cloned())
    }

    async fn professionals_with_capability(
        &self,
        capability: Option<Capability>,
    ) -> StoreResult<Vec<Professional>> {
        let state = self.state.lock().await;
        let mut professionals: Vec<Professional> = state
            .professionals
            .values()
            .filter(|p| capability.map_or(true, |c| p.has_capability(c)))
            .cloned()
            .collect();
        professionals.sort_by_key(|p| p.id);
        Ok(professionals)
    }

    async fn insert_match(&self, record: &Match) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let pair = (record.project_id, record.professional_id);
        if state.pairs.contains_key(&pair) {
            return Err(StoreError::Conflict {
                project_id: record.project_id,
                professional_id: record.professional_id,
            });
        }
        state.pairs.insert(pair, record.id);
        state.matches.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_match(&self, id: Uuid) -> StoreResult<Option<Match>> {
        Ok(self.state.lock().await.matches.get(&id).cloned())
    }

    async fn matched_professionals(&self, project_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let state = self.state.lock().await;
        Ok(state
            .pairs
            .keys()
            .filter(|(project, _)| *project == project_id)
            .map(|(_, professional)| *professional)
            .collect())
    }

    async fn matches_for_project(&self, project_id: Uuid, limit: usize) -> StoreResult<Vec<Match>> {
        let state = self.state.lock().await;
        let matches = state
            .matches
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        Ok(ranked(matches, limit))
    }

    async fn matches_for_professional(
        &self,
        professional_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Match>> {
        let state = self.state.lock().await;
        let matches = state
            .matches
            .values()
            .filter(|m| m.professional_id == professional_id)
            .cloned()
            .collect();
        Ok(ranked(matches, limit))
    }

    async fn update_match_score(&self, match_id: Uuid, score: &MatchScore) -> StoreResult<()> {
        if let Some(record) = self.state.lock().await.matches.get_mut(&match_id) {
            record.score = *score;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_match_status(&self, match_id: Uuid, status: MatchStatus) -> StoreResult<()> {
        if let Some(record) = self.state.lock().await.matches.get_mut(&match_id) {
            record.status = status;
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
