use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::far::{calculate_far, sanitize_area};
use crate::core::feasibility::assess_plot;
use crate::core::rules::RuleBook;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    FarRecord, FarResult, FeasibilityReport, PaymentEvent, PaymentEventResponse, PidVerification,
    Plot,
};
use crate::services::store::EngineStore;

/// Plot intake, zoning and feasibility operations
#[derive(Clone)]
pub struct FeasibilityService {
    store: Arc<dyn EngineStore>,
    rules: Arc<RuleBook>,
}

impl FeasibilityService {
    pub fn new(store: Arc<dyn EngineStore>, rules: Arc<RuleBook>) -> Self {
        Self { store, rules }
    }

    pub async fn register_plot(&self, plot: Plot) -> EngineResult<Plot> {
        if plot.city.trim().is_empty() {
            return Err(EngineError::validation("plot city must not be empty"));
        }
        self.store.upsert_plot(&plot).await?;
        tracing::info!("Registered plot {} ({} sqft)", plot.id, plot.area_sqft());
        Ok(plot)
    }

    pub async fn get_plot(&self, plot_id: Uuid) -> EngineResult<Plot> {
        self.store
            .get_plot(plot_id)
            .await?
            .ok_or_else(|| EngineError::not_found("plot", plot_id))
    }

    /// Record a PID lookup result against an existing plot
    pub async fn register_pid_verification(
        &self,
        verification: PidVerification,
    ) -> EngineResult<PidVerification> {
        self.get_plot(verification.plot_id).await?;
        if verification.pid_number.trim().is_empty() {
            return Err(EngineError::validation("pid_number must not be empty"));
        }
        self.store.upsert_pid_verification(&verification).await?;
        tracing::info!(
            "Recorded PID verification {} for plot {} ({})",
            verification.id,
            verification.plot_id,
            verification.status
        );
        Ok(verification)
    }

    /// Standalone FAR calculation. Nothing is persisted.
    pub fn compute_far(
        &self,
        plot_area_sqft: f64,
        road_width_ft: f64,
        zone_type: Option<&str>,
        city: Option<&str>,
    ) -> FarResult {
        calculate_far(&self.rules.far, plot_area_sqft, road_width_ft, zone_type, city)
    }

    /// FAR for a registered plot, persisted as a new record.
    /// The plot's own road width is used unless one is given.
    pub async fn compute_far_for_plot(
        &self,
        plot_id: Uuid,
        road_width_ft: Option<f64>,
        zone_type: Option<&str>,
    ) -> EngineResult<FarRecord> {
        let plot = self.get_plot(plot_id).await?;
        let road_width_ft = road_width_ft.unwrap_or(plot.road_width_ft);

        let result = self.compute_far(
            plot.area_sqft(),
            road_width_ft,
            zone_type,
            Some(plot.city.as_str()),
        );

        let record = FarRecord {
            id: Uuid::new_v4(),
            plot_id,
            result,
            created_at: Utc::now(),
        };
        self.store.insert_far_record(&record).await?;

        tracing::info!(
            "FAR {} for plot {} on {} ft road: {} sqft buildable",
            record.result.calculated_far,
            plot_id,
            road_width_ft,
            record.result.total_buildable_area_sqft
        );

        Ok(record)
    }

    pub async fn latest_far(&self, plot_id: Uuid) -> EngineResult<FarRecord> {
        self.get_plot(plot_id).await?;
        self.store
            .latest_far_record(plot_id)
            .await?
            .ok_or_else(|| EngineError::not_found("FAR result for plot", plot_id))
    }

    /// Assemble and persist a locked feasibility report
    pub async fn compute_feasibility(
        &self,
        plot_id: Uuid,
        total_buildable_area_sqft: f64,
    ) -> EngineResult<FeasibilityReport> {
        let plot = self.get_plot(plot_id).await?;
        let total = sanitize_area(total_buildable_area_sqft);

        let assessment = assess_plot(&self.rules, &plot, total, None);

        let report = FeasibilityReport {
            id: Uuid::new_v4(),
            plot_id,
            setbacks: assessment.setbacks,
            allowed_floors: assessment.floors.allowed_floors,
            total_built_up_area_sqft: assessment.total_built_up_area_sqft,
            saleable_area_sqft: assessment.floors.saleable_area_sqft,
            number_of_units: assessment.floors.number_of_units,
            is_unlocked: false,
            created_at: Utc::now(),
        };
        self.store.insert_report(&report).await?;

        tracing::info!(
            "Feasibility report {} for plot {}: {} ({} floors, {} units)",
            report.id,
            plot_id,
            report.setbacks.plot_category,
            report.allowed_floors,
            report.number_of_units
        );

        Ok(report)
    }

    /// Feasibility from the newest FAR record of the plot
    pub async fn compute_feasibility_from_latest_far(
        &self,
        plot_id: Uuid,
    ) -> EngineResult<FeasibilityReport> {
        self.get_plot(plot_id).await?;
        let far = self.store.latest_far_record(plot_id).await?.ok_or_else(|| {
            EngineError::validation(format!(
                "plot {} has no FAR result; compute FAR before feasibility",
                plot_id
            ))
        })?;

        self.compute_feasibility(plot_id, far.result.total_buildable_area_sqft)
            .await
    }

    pub async fn latest_feasibility(&self, plot_id: Uuid) -> EngineResult<FeasibilityReport> {
        self.get_plot(plot_id).await?;
        self.store
            .latest_report(plot_id)
            .await?
            .ok_or_else(|| EngineError::not_found("feasibility report for plot", plot_id))
    }

    /// Unlock the newest report of the plot. Unlocking twice is a no-op.
    pub async fn unlock_feasibility(&self, plot_id: Uuid) -> EngineResult<FeasibilityReport> {
        let mut report = self.latest_feasibility(plot_id).await?;

        if report.is_unlocked {
            tracing::debug!("Feasibility report {} already unlocked", report.id);
            return Ok(report);
        }

        self.store.set_report_unlocked(report.id).await?;
        report.is_unlocked = true;

        tracing::info!("Unlocked feasibility report {} for plot {}", report.id, plot_id);
        Ok(report)
    }

    /// Apply a transaction outcome from the payment collaborator.
    ///
    /// Only a successful feasibility unlock tied to a project unlocks that
    /// project's plot report; every other event is acknowledged and ignored.
    pub async fn apply_payment_event(
        &self,
        event: &PaymentEvent,
    ) -> EngineResult<PaymentEventResponse> {
        let Some(project_id) = event.unlocks_project() else {
            tracing::info!(
                "Ignoring payment event {} ({:?}, {:?})",
                event.transaction_id,
                event.transaction_type,
                event.status
            );
            return Ok(PaymentEventResponse {
                applied: false,
                report: None,
            });
        };

        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| EngineError::not_found("project", project_id))?;

        let report = self.unlock_feasibility(project.plot_id).await?;

        tracing::info!(
            "Payment {} unlocked feasibility for project {}",
            event.transaction_id,
            project_id
        );

        Ok(PaymentEventResponse {
            applied: true,
            report: Some(report),
        })
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }
}
