use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Capability, FarRecord, FeasibilityReport, Match, MatchScore, MatchStatus, PidVerification,
    Plot, Professional, Project, ProjectStatus,
};

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A match already exists for the (project, professional) pair
    #[error("match already exists for project {project_id} and professional {professional_id}")]
    Conflict {
        project_id: Uuid,
        professional_id: Uuid,
    },

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be mapped back onto the domain model
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence seam used by the services.
///
/// Implementations must enforce uniqueness of the (project, professional)
/// pair in [`EngineStore::insert_match`] atomically and report a duplicate
/// as [`StoreError::Conflict`]. Ranked reads return matches by total score,
/// best first.
#[async_trait]
pub trait EngineStore: Send + Sync {
    async fn upsert_plot(&self, plot: &Plot) -> StoreResult<()>;
    async fn get_plot(&self, id: Uuid) -> StoreResult<Option<Plot>>;

    async fn insert_far_record(&self, record: &FarRecord) -> StoreResult<()>;
    /// Newest FAR record for the plot
    async fn latest_far_record(&self, plot_id: Uuid) -> StoreResult<Option<FarRecord>>;

    async fn insert_report(&self, report: &FeasibilityReport) -> StoreResult<()>;
    /// Newest feasibility report for the plot
    async fn latest_report(&self, plot_id: Uuid) -> StoreResult<Option<FeasibilityReport>>;
    async fn set_report_unlocked(&self, report_id: Uuid) -> StoreResult<()>;

    async fn upsert_pid_verification(&self, verification: &PidVerification) -> StoreResult<()>;
    async fn pid_verifications_for_plot(&self, plot_id: Uuid) -> StoreResult<Vec<PidVerification>>;

    /// Insert a project, or update its details. An existing project keeps its stored status.
    async fn upsert_project(&self, project: &Project) -> StoreResult<()>;
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()>;

    async fn upsert_professional(&self, professional: &Professional) -> StoreResult<()>;
    async fn get_professional(&self, id: Uuid) -> StoreResult<Option<Professional>>;
    /// Professionals holding the capability; every professional when `None`
    async fn professionals_with_capability(
        &self,
        capability: Option<Capability>,
    ) -> StoreResult<Vec<Professional>>;

    /// Persist a match together with its score
    async fn insert_match(&self, record: &Match) -> StoreResult<()>;
    async fn get_match(&self, id: Uuid) -> StoreResult<Option<Match>>;
    /// Professional ids already paired with the project
    async fn matched_professionals(&self, project_id: Uuid) -> StoreResult<Vec<Uuid>>;
    async fn matches_for_project(&self, project_id: Uuid, limit: usize) -> StoreResult<Vec<Match>>;
    async fn matches_for_professional(
        &self,
        professional_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Match>>;
    async fn update_match_score(&self, match_id: Uuid, score: &MatchScore) -> StoreResult<()>;
    async fn set_match_status(&self, match_id: Uuid, status: MatchStatus) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<bool>;
}
