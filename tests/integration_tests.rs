// Integration tests for the Jointlly engine services and HTTP surface

use actix_web::{test, web, App};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

use jointlly_engine::config::MatchingSettings;
use jointlly_engine::core::{Matcher, RuleBook};
use jointlly_engine::error::EngineError;
use jointlly_engine::models::{
    Capability, FarRecord, FeasibilityReport, Match, MatchScore, MatchStatus, PaymentEvent, PidVerification, Plot, PricingTier, Professional,
    Project, ProjectIntent, ProjectStatus, ProjectType, TrackRecord, TransactionStatus, TransactionType, VerificationStatus,
};
use jointlly_engine::routes::{configure_routes, AppState};
use jointlly_engine::services::{
    EngineStore, FeasibilityService, MatchCache, MatchingService, MemoryStore, StoreResult,
};

struct Engine {
    store: Arc<dyn EngineStore>,
    feasibility: FeasibilityService,
    matching: MatchingService,
}

fn create_engine() -> Engine {
    let store: Arc<dyn EngineStore> = Arc::new(MemoryStore::new());
    let rules = Arc::new(RuleBook::default());
    Engine {
        feasibility: FeasibilityService::new(store.clone(), rules.clone()),
        matching: MatchingService::new(
            store.clone(),
            Matcher::new(rules),
            MatchCache::new(1000, 60),
            100,
        ),
        store,
    }
}

/// Memory store whose next project match read parks after reading until released
struct ParkingStore {
    inner: MemoryStore,
    armed: AtomicBool,
    read_done: Notify,
    release: Notify,
}

impl ParkingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            armed: AtomicBool::new(false),
            read_done: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl EngineStore for ParkingStore {
    async fn upsert_plot(&self, plot: &Plot) -> StoreResult<()> {
        self.inner.upsert_plot(plot).await
    }
    async fn get_plot(&self, id: Uuid) -> StoreResult<Option<Plot>> {
        self.inner.get_plot(id).await
    }
    async fn insert_far_record(&self, record: &FarRecord) -> StoreResult<()> {
        self.inner.insert_far_record(record).await
    }
    async fn latest_far_record(&self, plot_id: Uuid) -> StoreResult<Option<FarRecord>> {
        self.inner.latest_far_record(plot_id).await
    }
    async fn insert_report(&self, report: &FeasibilityReport) -> StoreResult<()> {
        self.inner.insert_report(report).await
    }
    async fn latest_report(&self, plot_id: Uuid) -> StoreResult<Option<FeasibilityReport>> {
        self.inner.latest_report(plot_id).await
    }
    async fn set_report_unlocked(&self, report_id: Uuid) -> StoreResult<()> {
        self.inner.set_report_unlocked(report_id).await
    }
    async fn upsert_pid_verification(&self, verification: &PidVerification) -> StoreResult<()> {
        self.inner.upsert_pid_verification(verification).await
    }
    async fn pid_verifications_for_plot(&self, plot_id: Uuid) -> StoreResult<Vec<PidVerification>> {
        self.inner.pid_verifications_for_plot(plot_id).await
    }
    async fn upsert_project(&self, project: &Project) -> StoreResult<()> {
        self.inner.upsert_project(project).await
    }
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        self.inner.get_project(id).await
    }
    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        self.inner.set_project_status(id, status).await
    }
    async fn upsert_professional(&self, professional: &Professional) -> StoreResult<()> {
        self.inner.upsert_professional(professional).await
    }
    async fn get_professional(&self, id: Uuid) -> StoreResult<Option<Professional>> {
        self.inner.get_professional(id).await
    }
    async fn professionals_with_capability(
        &self,
        capability: Option<Capability>,
    ) -> StoreResult<Vec<Professional>> {
        self.inner.professionals_with_capability(capability).await
    }
    async fn insert_match(&self, record: &Match) -> StoreResult<()> {
        self.inner.insert_match(record).await
    }
    async fn get_match(&self, id: Uuid) -> StoreResult<Option<Match>> {
        self.inner.get_match(id).await
    }
    async fn matched_professionals(&self, project_id: Uuid) -> StoreResult<Vec<Uuid>> {
        self.inner.matched_professionals(project_id).await
    }
    async fn matches_for_project(&self, project_id: Uuid, limit: usize) -> StoreResult<Vec<Match>> {
        let read = self.inner.matches_for_project(project_id, limit).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.read_done.notify_one();
            self.release.notified().await;
        }
        read
    }
    async fn matches_for_professional(
        &self,
        professional_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Match>> {
        self.inner.matches_for_professional(professional_id, limit).await
    }
    async fn update_match_score(&self, match_id: Uuid, score: &MatchScore) -> StoreResult<()> {
        self.inner.update_match_score(match_id, score).await
    }
    async fn set_match_status(&self, match_id: Uuid, status: MatchStatus) -> StoreResult<()> {
        self.inner.set_match_status(match_id, status).await
    }
    async fn health_check(&self) -> StoreResult<bool> {
        self.inner.health_check().await
    }
}

fn create_test_plot(width_ft: f64, length_ft: f64) -> Plot {
    Plot {
        id: Uuid::new_v4(),
        city: "Bengaluru".to_string(),
        width_ft,
        length_ft,
        road_width_ft: 35.0,
        facing: Some("East".to_string()),
        is_corner: false,
        pid_number: Some("PID-001".to_string()),
        tax_paid: true,
        e_khatha_status: None,
    }
}

fn create_test_project(plot_id: Uuid, project_type: ProjectType) -> Project {
    Project {
        id: Uuid::new_v4(),
        plot_id,
        project_type,
        intent: None,
        status: ProjectStatus::Draft,
    }
}

fn create_test_professional(
    capability: Capability,
    max_area_sqft: Option<f64>,
    price_per_sqft: f64,
    preferences: &[&str],
) -> Professional {
    Professional {
        id: Uuid::new_v4(),
        company_name: format!("{} Partners", capability),
        city: Some("Bengaluru".to_string()),
        capabilities: [capability].into_iter().collect(),
        pricing_tiers: vec![PricingTier {
            capability,
            min_area_sqft: Some(0.0),
            max_area_sqft,
            price_per_sqft,
            tier_name: None,
        }],
        location_preferences: preferences.iter().map(|p| p.to_string()).collect(),
        track_record: TrackRecord::default(),
        credibility_score: 0.0,
    }
}

fn verified_pid(plot_id: Uuid) -> PidVerification {
    PidVerification {
        id: Uuid::new_v4(),
        plot_id,
        pid_number: "PID-001".to_string(),
        e_khatha_status: Some("ISSUED".to_string()),
        status: VerificationStatus::Verified,
    }
}

/// Registers a plot, a project on it and the given professionals
async fn seed(
    engine: &Engine,
    project_type: ProjectType,
    professionals: Vec<Professional>,
) -> (Plot, Project) {
    let plot = engine
        .feasibility
        .register_plot(create_test_plot(40.0, 60.0))
        .await
        .unwrap();
    let project = engine
        .matching
        .register_project(create_test_project(plot.id, project_type))
        .await
        .unwrap();
    for professional in professionals {
        engine.matching.register_professional(professional).await.unwrap();
    }
    (plot, project)
}

#[tokio::test]
async fn test_publish_batch_is_idempotent() {
    let engine = create_engine();
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![
            create_test_professional(Capability::Construction, None, 1800.0, &["Bengaluru"]),
            create_test_professional(Capability::Construction, None, 2600.0, &[]),
            create_test_professional(Capability::Interior, None, 1500.0, &["Bengaluru"]),
        ],
    )
    .await;

    let first = engine.matching.publish_and_match(project.id).await.unwrap();
    assert_eq!(first.project.status, ProjectStatus::Published);
    assert_eq!(first.created.len(), 2, "only capable professionals are candidates");

    let second = engine.matching.publish_and_match(project.id).await.unwrap();
    assert!(second.created.is_empty());

    let stored = engine.matching.project_matches(project.id, 100).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_concurrent_batches_do_not_duplicate_pairs() {
    let engine = create_engine();
    let professionals: Vec<Professional> = (0..10)
        .map(|i| create_test_professional(Capability::Construction, None, 1000.0 + i as f64 * 300.0, &[]))
        .collect();
    let (_, project) = seed(&engine, ProjectType::ContractConstruction, professionals).await;

    let (a, b) = tokio::join!(
        engine.matching.publish_and_match(project.id),
        engine.matching.publish_and_match(project.id)
    );
    let created = a.unwrap().created.len() + b.unwrap().created.len();
    assert_eq!(created, 10);

    let stored = engine.store.matches_for_project(project.id, usize::MAX).await.unwrap();
    assert_eq!(stored.len(), 10);
}

#[tokio::test]
async fn test_jv_jd_requires_verified_pid() {
    let engine = create_engine();
    let (plot, project) = seed(
        &engine,
        ProjectType::JvJd,
        vec![create_test_professional(Capability::JvJd, None, 2000.0, &[])],
    )
    .await;

    let err = engine.matching.publish_and_match(project.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(
        engine.matching.get_project(project.id).await.unwrap().status,
        ProjectStatus::Draft
    );

    let pending = PidVerification {
        status: VerificationStatus::Pending,
        ..verified_pid(plot.id)
    };
    engine.feasibility.register_pid_verification(pending).await.unwrap();
    assert!(engine.matching.publish_and_match(project.id).await.is_err());

    engine
        .feasibility
        .register_pid_verification(verified_pid(plot.id))
        .await
        .unwrap();
    let published = engine.matching.publish_and_match(project.id).await.unwrap();
    assert_eq!(published.created.len(), 1);
    // verified PID, pid number and tax paid; no e-khatha
    assert!((published.created[0].score.verification_score - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_contract_construction_publishes_without_pid() {
    let engine = create_engine();
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![create_test_professional(Capability::Construction, None, 2000.0, &[])],
    )
    .await;

    let published = engine.matching.publish_and_match(project.id).await.unwrap();
    assert_eq!(published.created.len(), 1);
}

#[tokio::test]
async fn test_matched_project_cannot_be_published() {
    let engine = create_engine();
    let plot = engine
        .feasibility
        .register_plot(create_test_plot(30.0, 40.0))
        .await
        .unwrap();
    let project = engine
        .matching
        .register_project(create_test_project(plot.id, ProjectType::Interior))
        .await
        .unwrap();
    engine
        .store
        .set_project_status(project.id, ProjectStatus::Matched)
        .await
        .unwrap();

    let err = engine.matching.publish_and_match(project.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn test_registration_does_not_move_project_status() {
    let engine = create_engine();
    let plot = engine
        .feasibility
        .register_plot(create_test_plot(40.0, 60.0))
        .await
        .unwrap();

    // A JV/JD project cannot skip the PID gate by arriving as PUBLISHED
    let mut jv = create_test_project(plot.id, ProjectType::JvJd);
    jv.status = ProjectStatus::Published;
    let err = engine.matching.register_project(jv.clone()).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.store.get_project(jv.id).await.unwrap().is_none());

    // Re-registering a matched project as DRAFT keeps it matched
    let project = engine
        .matching
        .register_project(create_test_project(plot.id, ProjectType::Interior))
        .await
        .unwrap();
    engine
        .store
        .set_project_status(project.id, ProjectStatus::Matched)
        .await
        .unwrap();

    let mut resent = project.clone();
    resent.intent = Some(ProjectIntent::Commercial);
    let updated = engine.matching.register_project(resent).await.unwrap();
    assert_eq!(updated.status, ProjectStatus::Matched);
    assert_eq!(updated.intent, Some(ProjectIntent::Commercial));

    let mut rewound = project.clone();
    rewound.status = ProjectStatus::Published;
    let err = engine.matching.register_project(rewound).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let stored = engine.matching.get_project(project.id).await.unwrap();
    assert_eq!(stored.status, ProjectStatus::Matched);
    assert_eq!(stored.intent, Some(ProjectIntent::Commercial));
}

#[tokio::test]
async fn test_batch_keeps_stale_scores_until_refresh() {
    let engine = create_engine();
    // Covers up to 3000 sqft: the 2400 sqft plot fits, a 4800 sqft built-up area does not
    let (plot, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![create_test_professional(Capability::Construction, Some(3000.0), 2000.0, &[])],
    )
    .await;

    let published = engine.matching.publish_and_match(project.id).await.unwrap();
    let original = published.created[0].clone();
    assert_eq!(original.score.project_size_score, 1.0);
    assert_eq!(original.score.pricing_score, 0.75);

    engine.feasibility.compute_far_for_plot(plot.id, None, None).await.unwrap();
    let report = engine
        .feasibility
        .compute_feasibility_from_latest_far(plot.id)
        .await
        .unwrap();
    assert_eq!(report.total_built_up_area_sqft, 4800.0);

    engine.matching.publish_and_match(project.id).await.unwrap();
    let after_batch = engine.matching.project_matches(project.id, 10).await.unwrap();
    assert_eq!(after_batch[0].score, original.score);

    let refreshed = engine.matching.refresh_scores(project.id).await.unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].id, original.id);
    assert_eq!(refreshed[0].score.project_size_score, 0.5);
    assert_eq!(refreshed[0].score.pricing_score, 0.5);

    let read_back = engine.matching.project_matches(project.id, 10).await.unwrap();
    assert_eq!(read_back[0].score, refreshed[0].score);
}

#[tokio::test]
async fn test_ranked_reads_respect_limit_and_order() {
    let engine = create_engine();
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![
            create_test_professional(Capability::Construction, None, 4500.0, &["Mysuru"]),
            create_test_professional(Capability::Construction, None, 1000.0, &["Bengaluru"]),
            create_test_professional(Capability::Construction, None, 3000.0, &[]),
        ],
    )
    .await;
    engine.matching.publish_and_match(project.id).await.unwrap();

    let top_two = engine.matching.project_matches(project.id, 2).await.unwrap();
    assert_eq!(top_two.len(), 2);
    assert!(top_two[0].score.total_score >= top_two[1].score.total_score);

    let all = engine.matching.project_matches(project.id, 10).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, top_two[0].id);
    assert!(all[1].score.total_score >= all[2].score.total_score);

    let best = all[0].professional_id;
    let for_professional = engine.matching.professional_matches(best, 5).await.unwrap();
    assert_eq!(for_professional.len(), 1);
    assert_eq!(for_professional[0].project_id, project.id);
}

#[tokio::test]
async fn test_read_racing_a_transition_does_not_cache_stale_status() {
    let parking = Arc::new(ParkingStore::new());
    let store: Arc<dyn EngineStore> = parking.clone();
    let rules = Arc::new(RuleBook::default());
    let engine = Engine {
        feasibility: FeasibilityService::new(store.clone(), rules.clone()),
        matching: MatchingService::new(
            store.clone(),
            Matcher::new(rules),
            MatchCache::new(1000, 300),
            100,
        ),
        store,
    };
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![create_test_professional(Capability::Construction, None, 2000.0, &[])],
    )
    .await;
    let created = engine.matching.publish_and_match(project.id).await.unwrap().created;
    let match_id = created[0].id;

    parking.armed.store(true, Ordering::SeqCst);
    let reader = {
        let matching = engine.matching.clone();
        tokio::spawn(async move { matching.project_matches(project.id, 10).await })
    };

    // The reader holds a PENDING snapshot while the accept commits
    parking.read_done.notified().await;
    engine.matching.accept_match(match_id).await.unwrap();
    parking.release.notify_one();

    let snapshot = reader.await.unwrap().unwrap();
    assert_eq!(snapshot[0].status, MatchStatus::Pending);

    let stored = engine.store.get_match(match_id).await.unwrap().unwrap();
    let served = engine.matching.project_matches(project.id, 10).await.unwrap();
    assert_eq!(stored.status, MatchStatus::Accepted);
    assert_eq!(served[0].status, stored.status);
}

#[tokio::test]
async fn test_match_transitions() {
    let engine = create_engine();
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![
            create_test_professional(Capability::Construction, None, 2000.0, &[]),
            create_test_professional(Capability::Construction, None, 2500.0, &[]),
        ],
    )
    .await;
    let created = engine.matching.publish_and_match(project.id).await.unwrap().created;

    let accepted = engine.matching.accept_match(created[0].id).await.unwrap();
    assert_eq!(accepted.status, MatchStatus::Accepted);
    assert!(engine.matching.accept_match(created[0].id).await.is_ok());
    assert!(matches!(
        engine.matching.reject_match(created[0].id).await,
        Err(EngineError::Validation(_))
    ));

    let rejected = engine.matching.reject_match(created[1].id).await.unwrap();
    assert_eq!(rejected.status, MatchStatus::Rejected);
    assert!(engine.matching.accept_match(created[1].id).await.is_err());

    // The cached list reflects the new statuses
    let matches = engine.matching.project_matches(project.id, 10).await.unwrap();
    assert!(matches.iter().all(|m| m.status != MatchStatus::Pending));
}

#[tokio::test]
async fn test_not_found_cases() {
    let engine = create_engine();
    let missing = Uuid::new_v4();

    assert!(matches!(
        engine.matching.publish_and_match(missing).await,
        Err(EngineError::NotFound { entity: "project", .. })
    ));
    assert!(matches!(
        engine.matching.accept_match(missing).await,
        Err(EngineError::NotFound { entity: "match", .. })
    ));
    assert!(matches!(
        engine.matching.professional_matches(missing, 10).await,
        Err(EngineError::NotFound { entity: "professional", .. })
    ));
    assert!(matches!(
        engine.feasibility.compute_far_for_plot(missing, None, None).await,
        Err(EngineError::NotFound { entity: "plot", .. })
    ));
    assert!(matches!(
        engine.matching.register_project(create_test_project(missing, ProjectType::Interior)).await,
        Err(EngineError::NotFound { entity: "plot", .. })
    ));
}

#[tokio::test]
async fn test_registration_computes_credibility() {
    let engine = create_engine();
    let mut professional = create_test_professional(Capability::Construction, None, 2000.0, &[]);
    professional.track_record = TrackRecord {
        license_count: 2,
        portfolio_count: 3,
        rera_registered: true,
        experience_years: 5,
        projects_completed: 10,
        office_address: None,
    };
    // Submitted scores are recomputed
    professional.credibility_score = 0.99;

    let registered = engine.matching.register_professional(professional).await.unwrap();
    // 0.20 + 0.15 + 0.10 + 0.20 + 0.075 + 0.05 + 0
    assert_eq!(registered.credibility_score, 0.775);

    let stored = engine.matching.get_professional(registered.id).await.unwrap();
    assert_eq!(stored.credibility_score, 0.775);
    assert_eq!(stored.track_record.portfolio_count, 3);
}

#[tokio::test]
async fn test_malformed_pricing_tier_rejected() {
    let engine = create_engine();
    let mut professional = create_test_professional(Capability::Interior, Some(1000.0), 1500.0, &[]);
    professional.pricing_tiers[0].min_area_sqft = Some(2000.0);

    assert!(matches!(
        engine.matching.register_professional(professional).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_unlock_is_idempotent() {
    let engine = create_engine();
    let plot = engine
        .feasibility
        .register_plot(create_test_plot(40.0, 60.0))
        .await
        .unwrap();

    assert!(matches!(
        engine.feasibility.unlock_feasibility(plot.id).await,
        Err(EngineError::NotFound { .. })
    ));

    let report = engine.feasibility.compute_feasibility(plot.id, 4800.0).await.unwrap();
    assert!(!report.is_unlocked);

    let unlocked = engine.feasibility.unlock_feasibility(plot.id).await.unwrap();
    assert!(unlocked.is_unlocked);
    assert_eq!(unlocked.id, report.id);

    let again = engine.feasibility.unlock_feasibility(plot.id).await.unwrap();
    assert!(again.is_unlocked);
    assert!(engine.feasibility.latest_feasibility(plot.id).await.unwrap().is_unlocked);
}

#[tokio::test]
async fn test_payment_events() {
    let engine = create_engine();
    let (plot, project) = seed(&engine, ProjectType::ContractConstruction, vec![]).await;
    engine.feasibility.compute_feasibility(plot.id, 4800.0).await.unwrap();

    let mut event = PaymentEvent {
        transaction_id: Uuid::new_v4(),
        transaction_type: TransactionType::FeasibilityUnlock,
        status: TransactionStatus::Failed,
        project_id: Some(project.id),
    };
    let ignored = engine.feasibility.apply_payment_event(&event).await.unwrap();
    assert!(!ignored.applied);
    assert!(!engine.feasibility.latest_feasibility(plot.id).await.unwrap().is_unlocked);

    event.transaction_type = TransactionType::PriorityListing;
    event.status = TransactionStatus::Success;
    assert!(!engine.feasibility.apply_payment_event(&event).await.unwrap().applied);

    event.transaction_type = TransactionType::FeasibilityUnlock;
    let applied = engine.feasibility.apply_payment_event(&event).await.unwrap();
    assert!(applied.applied);
    assert!(applied.report.unwrap().is_unlocked);

    event.project_id = Some(Uuid::new_v4());
    assert!(matches!(
        engine.feasibility.apply_payment_event(&event).await,
        Err(EngineError::NotFound { entity: "project", .. })
    ));
}

#[tokio::test]
async fn test_project_area_follows_latest_report() {
    let engine = create_engine();
    // Tier covers 4000-6000 sqft: misses the 2400 sqft plot, covers a 4800 sqft report
    let mut professional = create_test_professional(Capability::Construction, Some(6000.0), 2000.0, &[]);
    professional.pricing_tiers[0].min_area_sqft = Some(4000.0);
    let (plot, project) = seed(&engine, ProjectType::ContractConstruction, vec![professional]).await;

    engine.feasibility.compute_feasibility(plot.id, 4800.0).await.unwrap();
    let created = engine.matching.publish_and_match(project.id).await.unwrap().created;

    assert_eq!(created[0].score.project_size_score, 1.0);
    assert_eq!(created[0].score.pricing_score, 0.75);
}

#[actix_web::test]
async fn test_http_far_and_errors() {
    let engine = create_engine();
    let state = AppState {
        feasibility: engine.feasibility.clone(),
        matching: engine.matching.clone(),
        store: engine.store.clone(),
        limits: MatchingSettings {
            default_limit: Some(20),
            max_limit: Some(100),
        },
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/far")
        .set_json(serde_json::json!({ "plotAreaSqft": 1200.0, "roadWidthFt": 35.0 }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["calculatedFar"], 2.0);
    assert_eq!(body["totalBuildableAreaSqft"], 2400.0);
    assert_eq!(body["zoneType"], "Residential");

    let req = test::TestRequest::post()
        .uri("/api/v1/far")
        .set_json(serde_json::json!({ "plotAreaSqft": 1200.0, "roadWidthFt": -1.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 422);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/plots/{}/far", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["statusCode"], 404);

    // Empty body falls back to the plot's road width, a broken one is rejected
    let plot = engine
        .feasibility
        .register_plot(create_test_plot(40.0, 60.0))
        .await
        .unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/plots/{}/far", plot.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);

    for uri in [
        format!("/api/v1/plots/{}/far", plot.id),
        format!("/api/v1/plots/{}/feasibility", plot.id),
    ] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"roadWidthFt": 60.0"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "{}", uri);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_json");
    }

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_http_publish_and_list() {
    let engine = create_engine();
    let (_, project) = seed(
        &engine,
        ProjectType::ContractConstruction,
        vec![
            create_test_professional(Capability::Construction, None, 2000.0, &[]),
            create_test_professional(Capability::Construction, None, 3000.0, &[]),
        ],
    )
    .await;
    let state = AppState {
        feasibility: engine.feasibility.clone(),
        matching: engine.matching.clone(),
        store: engine.store.clone(),
        limits: MatchingSettings {
            default_limit: Some(1),
            max_limit: Some(10),
        },
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/projects/{}/publish", project.id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["project"]["status"], "PUBLISHED");
    assert_eq!(body["created"].as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{}/matches", project.id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalResults"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{}/matches?limit=5", project.id))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalResults"], 2);
}
