use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::models::{
    Capability, FarRecord, FarResult, FeasibilityReport, Match, MatchScore, MatchStatus,
    PidVerification, Plot, PricingTier, Professional, Project, ProjectStatus, SetbackResult, TrackRecord,
    UnknownVariant,
};
use crate::services::store::{EngineStore, StoreError, StoreResult};

/// Match status as stored in the `match_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
pub enum DbMatchStatus {
    Pending,
    Accepted,
    Rejected,
}

impl From<MatchStatus> for DbMatchStatus {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Pending => DbMatchStatus::Pending,
            MatchStatus::Accepted => DbMatchStatus::Accepted,
            MatchStatus::Rejected => DbMatchStatus::Rejected,
        }
    }
}

impl From<DbMatchStatus> for MatchStatus {
    fn from(value: DbMatchStatus) -> Self {
        match value {
            DbMatchStatus::Pending => MatchStatus::Pending,
            DbMatchStatus::Accepted => MatchStatus::Accepted,
            DbMatchStatus::Rejected => MatchStatus::Rejected,
        }
    }
}

fn parse_label<T>(value: &str) -> StoreResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .parse()
        .map_err(|e: UnknownVariant| StoreError::Corrupt(e.to_string()))
}

fn to_count(value: i32, column: &str) -> StoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("negative {}: {}", column, value)))
}

/// INTEGER column value for a count; saturates at `i32::MAX`
fn sql_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// LIMIT value for a row cap; `usize::MAX` means no cap
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

const MATCH_COLUMNS: &str = r#"
    m.id, m.project_id, m.professional_id, m.status, m.created_at, m.updated_at,
    s.project_type_score, s.location_score, s.project_size_score, s.pricing_score,
    s.capability_score, s.verification_score, s.total_score
"#;

const REPORT_COLUMNS: &str = r#"
    id, plot_id, plot_category,
    front_setback_m, rear_setback_m, side_setback_m,
    front_setback_ft, rear_setback_ft, side_setback_ft,
    net_length_ft, net_width_ft, net_buildable_area_sqft,
    allowed_floors, total_built_up_area_sqft, saleable_area_sqft, number_of_units,
    is_unlocked, created_at
"#;

/// PostgreSQL-backed store
///
/// Migrations under `migrations/` run on connect. Pair uniqueness is the
/// `UNIQUE (project_id, professional_id)` constraint on `matches`.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Connect using the `[database]` settings section
    pub async fn from_settings(settings: &DatabaseSettings) -> StoreResult<Self> {
        tracing::info!(
            "Connecting to PostgreSQL (max {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    fn map_plot(row: &PgRow) -> StoreResult<Plot> {
        Ok(Plot {
            id: row.try_get("id")?,
            city: row.try_get("city")?,
            width_ft: row.try_get("width_ft")?,
            length_ft: row.try_get("length_ft")?,
            road_width_ft: row.try_get("road_width_ft")?,
            facing: row.try_get("facing")?,
            is_corner: row.try_get("is_corner")?,
            pid_number: row.try_get("pid_number")?,
            tax_paid: row.try_get("tax_paid")?,
            e_khatha_status: row.try_get("e_khatha_status")?,
        })
    }

    fn map_far_record(row: &PgRow) -> StoreResult<FarRecord> {
        Ok(FarRecord {
            id: row.try_get("id")?,
            plot_id: row.try_get("plot_id")?,
            result: FarResult {
                plot_area_sqft: row.try_get("plot_area_sqft")?,
                road_width_ft: row.try_get("road_width_ft")?,
                zone_type: row.try_get("zone_type")?,
                rule_table: row.try_get("rule_table")?,
                calculated_far: row.try_get("calculated_far")?,
                min_far: row.try_get("min_far")?,
                max_far: row.try_get("max_far")?,
                base_far: row.try_get("base_far")?,
                premium_available: row.try_get("premium_available")?,
                total_buildable_area_sqft: row.try_get("total_buildable_area_sqft")?,
            },
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_report(row: &PgRow) -> StoreResult<FeasibilityReport> {
        let category: String = row.try_get("plot_category")?;
        Ok(FeasibilityReport {
            id: row.try_get("id")?,
            plot_id: row.try_get("plot_id")?,
            setbacks: SetbackResult {
                plot_category: parse_label(&category)?,
                front_setback_m: row.try_get("front_setback_m")?,
                rear_setback_m: row.try_get("rear_setback_m")?,
                side_setback_m: row.try_get("side_setback_m")?,
                front_setback_ft: row.try_get("front_setback_ft")?,
                rear_setback_ft: row.try_get("rear_setback_ft")?,
                side_setback_ft: row.try_get("side_setback_ft")?,
                net_length_ft: row.try_get("net_length_ft")?,
                net_width_ft: row.try_get("net_width_ft")?,
                net_buildable_area_sqft: row.try_get("net_buildable_area_sqft")?,
            },
            allowed_floors: to_count(row.try_get("allowed_floors")?, "allowed_floors")?,
            total_built_up_area_sqft: row.try_get("total_built_up_area_sqft")?,
            saleable_area_sqft: row.try_get("saleable_area_sqft")?,
            number_of_units: to_count(row.try_get("number_of_units")?, "number_of_units")?,
            is_unlocked: row.try_get("is_unlocked")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_project(row: &PgRow) -> StoreResult<Project> {
        let project_type: String = row.try_get("project_type")?;
        let intent: Option<String> = row.try_get("intent")?;
        let status: String = row.try_get("status")?;
        Ok(Project {
            id: row.try_get("id")?,
            plot_id: row.try_get("plot_id")?,
            project_type: parse_label(&project_type)?,
            intent: intent.as_deref().map(parse_label).transpose()?,
            status: parse_label(&status)?,
        })
    }

    fn map_match(row: &PgRow) -> StoreResult<Match> {
        let status: DbMatchStatus = row.try_get("status")?;
        Ok(Match {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            professional_id: row.try_get("professional_id")?,
            status: status.into(),
            score: MatchScore {
                project_type_score: row.try_get("project_type_score")?,
                location_score: row.try_get("location_score")?,
                project_size_score: row.try_get("project_size_score")?,
                pricing_score: row.try_get("pricing_score")?,
                capability_score: row.try_get("capability_score")?,
                verification_score: row.try_get("verification_score")?,
                total_score: row.try_get("total_score")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Load professionals and attach their pricing tiers
    async fn load_professionals(&self, rows: Vec<PgRow>) -> StoreResult<Vec<Professional>> {
        let mut professionals = Vec::with_capacity(rows.len());
        for row in &rows {
            let capabilities: Vec<String> = row.try_get("capabilities")?;
            professionals.push(Professional {
                id: row.try_get("id")?,
                company_name: row.try_get("company_name")?,
                city: row.try_get("city")?,
                capabilities: capabilities
                    .iter()
                    .map(|c| parse_label::<Capability>(c))
                    .collect::<StoreResult<BTreeSet<_>>>()?,
                pricing_tiers: Vec::new(),
                location_preferences: row.try_get("location_preferences")?,
                track_record: TrackRecord {
                    license_count: to_count(row.try_get("license_count")?, "license_count")?,
                    portfolio_count: to_count(row.try_get("portfolio_count")?, "portfolio_count")?,
                    rera_registered: row.try_get("rera_registered")?,
                    experience_years: to_count(row.try_get("experience_years")?, "experience_years")?,
                    projects_completed: to_count(
                        row.try_get("projects_completed")?,
                        "projects_completed",
                    )?,
                    office_address: row.try_get("office_address")?,
                },
                credibility_score: row.try_get("credibility_score")?,
            });
        }

        if professionals.is_empty() {
            return Ok(professionals);
        }

        let ids: Vec<Uuid> = professionals.iter().map(|p| p.id).collect();
        let tier_rows = sqlx::query(
            r#"
            SELECT professional_id, capability, min_area_sqft, max_area_sqft, price_per_sqft, tier_name
            FROM pricing_tiers
            WHERE professional_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tiers: HashMap<Uuid, Vec<PricingTier>> = HashMap::new();
        for row in &tier_rows {
            let capability: String = row.try_get("capability")?;
            tiers
                .entry(row.try_get("professional_id")?)
                .or_default()
                .push(PricingTier {
                    capability: parse_label(&capability)?,
                    min_area_sqft: row.try_get("min_area_sqft")?,
                    max_area_sqft: row.try_get("max_area_sqft")?,
                    price_per_sqft: row.try_get("price_per_sqft")?,
                    tier_name: row.try_get("tier_name")?,
                });
        }

        for professional in &mut professionals {
            professional.pricing_tiers = tiers.remove(&professional.id).unwrap_or_default();
        }

        Ok(professionals)
    }
}

#[async_trait]
impl EngineStore for PostgresStore {
    async fn upsert_plot(&self, plot: &Plot) -> StoreResult<()> {
        let query = r#"
            INSERT INTO plots (id, city, width_ft, length_ft, road_width_ft, facing, is_corner,
                               pid_number, tax_paid, e_khatha_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id)
            DO UPDATE SET
                city = EXCLUDED.city,
                width_ft = EXCLUDED.width_ft,
                length_ft = EXCLUDED.length_ft,
                road_width_ft = EXCLUDED.road_width_ft,
                facing = EXCLUDED.facing,
                is_corner = EXCLUDED.is_corner,
                pid_number = EXCLUDED.pid_number,
                tax_paid = EXCLUDED.tax_paid,
                e_khatha_status = EXCLUDED.e_khatha_status
        "#;

        sqlx::query(query)
            .bind(plot.id)
            .bind(&plot.city)
            .bind(plot.width_ft)
            .bind(plot.length_ft)
            .bind(plot.road_width_ft)
            .bind(&plot.facing)
            .bind(plot.is_corner)
            .bind(&plot.pid_number)
            .bind(plot.tax_paid)
            .bind(&plot.e_khatha_status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_plot(&self, id: Uuid) -> StoreResult<Option<Plot>> {
        sqlx::query("SELECT * FROM plots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::map_plot)
            .transpose()
    }

    async fn insert_far_record(&self, record: &FarRecord) -> StoreResult<()> {
        let query = r#"
            INSERT INTO far_results (id, plot_id, plot_area_sqft, road_width_ft, zone_type, rule_table,
                                     calculated_far, min_far, max_far, base_far, premium_available,
                                     total_buildable_area_sqft, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#;

        let result = &record.result;
        sqlx::query(query)
            .bind(record.id)
            .bind(record.plot_id)
            .bind(result.plot_area_sqft)
            .bind(result.road_width_ft)
            .bind(&result.zone_type)
            .bind(&result.rule_table)
            .bind(result.calculated_far)
            .bind(result.min_far)
            .bind(result.max_far)
            .bind(result.base_far)
            .bind(result.premium_available)
            .bind(result.total_buildable_area_sqft)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn latest_far_record(&self, plot_id: Uuid) -> StoreResult<Option<FarRecord>> {
        let query = r#"
            SELECT * FROM far_results
            WHERE plot_id = $1
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        sqlx::query(query)
            .bind(plot_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::map_far_record)
            .transpose()
    }

    async fn insert_report(&self, report: &FeasibilityReport) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO feasibility_reports ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
            REPORT_COLUMNS
        );

        let setbacks = &report.setbacks;
        sqlx::query(&query)
            .bind(report.id)
            .bind(report.plot_id)
            .bind(setbacks.plot_category.label())
            .bind(setbacks.front_setback_m)
            .bind(setbacks.rear_setback_m)
            .bind(setbacks.side_setback_m)
            .bind(setbacks.front_setback_ft)
            .bind(setbacks.rear_setback_ft)
            .bind(setbacks.side_setback_ft)
            .bind(setbacks.net_length_ft)
            .bind(setbacks.net_width_ft)
            .bind(setbacks.net_buildable_area_sqft)
            .bind(report.allowed_floors as i32)
            .bind(report.total_built_up_area_sqft)
            .bind(report.saleable_area_sqft)
            .bind(report.number_of_units as i32)
            .bind(report.is_unlocked)
            .bind(report.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn latest_report(&self, plot_id: Uuid) -> StoreResult<Option<FeasibilityReport>> {
        let query = format!(
            "SELECT {} FROM feasibility_reports WHERE plot_id = $1 ORDER BY created_at DESC LIMIT 1",
            REPORT_COLUMNS
        );

        sqlx::query(&query)
            .bind(plot_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::map_report)
            .transpose()
    }

    async fn set_report_unlocked(&self, report_id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE feasibility_reports SET is_unlocked = TRUE WHERE id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_pid_verification(&self, verification: &PidVerification) -> StoreResult<()> {
        let query = r#"
            INSERT INTO pid_verifications (id, plot_id, pid_number, e_khatha_status, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                pid_number = EXCLUDED.pid_number,
                e_khatha_status = EXCLUDED.e_khatha_status,
                status = EXCLUDED.status
        "#;

        sqlx::query(query)
            .bind(verification.id)
            .bind(verification.plot_id)
            .bind(&verification.pid_number)
            .bind(&verification.e_khatha_status)
            .bind(verification.status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn pid_verifications_for_plot(&self, plot_id: Uuid) -> StoreResult<Vec<PidVerification>> {
        let rows = sqlx::query("SELECT * FROM pid_verifications WHERE plot_id = $1")
            .bind(plot_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let status: String = row.try_get("status")?;
                Ok(PidVerification {
                    id: row.try_get("id")?,
                    plot_id: row.try_get("plot_id")?,
                    pid_number: row.try_get("pid_number")?,
                    e_khatha_status: row.try_get("e_khatha_status")?,
                    status: parse_label(&status)?,
                })
            })
            .collect()
    }

    async fn upsert_project(&self, project: &Project) -> StoreResult<()> {
        let query = r#"
            INSERT INTO projects (id, plot_id, project_type, intent, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                plot_id = EXCLUDED.plot_id,
                project_type = EXCLUDED.project_type,
                intent = EXCLUDED.intent
        "#;

        sqlx::query(query)
            .bind(project.id)
            .bind(project.plot_id)
            .bind(project.project_type.as_str())
            .bind(project.intent.map(|i| i.as_str()))
            .bind(project.status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        sqlx::query("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::map_project)
            .transpose()
    }

    async fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        sqlx::query("UPDATE projects SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_professional(&self, professional: &Professional) -> StoreResult<()> {
        let capabilities: Vec<String> = professional
            .capabilities
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();
        let record = &professional.track_record;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO professionals (id, company_name, city, capabilities, location_preferences,
                license_count, portfolio_count, rera_registered, experience_years,
                projects_completed, office_address, credibility_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                city = EXCLUDED.city,
                capabilities = EXCLUDED.capabilities,
                location_preferences = EXCLUDED.location_preferences,
                license_count = EXCLUDED.license_count,
                portfolio_count = EXCLUDED.portfolio_count,
                rera_registered = EXCLUDED.rera_registered,
                experience_years = EXCLUDED.experience_years,
                projects_completed = EXCLUDED.projects_completed,
                office_address = EXCLUDED.office_address,
                credibility_score = EXCLUDED.credibility_score
            "#,
        )
        .bind(professional.id)
        .bind(&professional.company_name)
        .bind(&professional.city)
        .bind(&capabilities)
        .bind(&professional.location_preferences)
        .bind(sql_count(record.license_count))
        .bind(sql_count(record.portfolio_count))
        .bind(record.rera_registered)
        .bind(sql_count(record.experience_years))
        .bind(sql_count(record.projects_completed))
        .bind(&record.office_address)
        .bind(professional.credibility_score)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM pricing_tiers WHERE professional_id = $1")
            .bind(professional.id)
            .execute(&mut *tx)
            .await?;

        for tier in &professional.pricing_tiers {
            sqlx::query(
                r#"
                INSERT INTO pricing_tiers (professional_id, capability, min_area_sqft, max_area_sqft,
                                           price_per_sqft, tier_name)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(professional.id)
            .bind(tier.capability.as_str())
            .bind(tier.min_area_sqft)
            .bind(tier.max_area_sqft)
            .bind(tier.price_per_sqft)
            .bind(&tier.tier_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_professional(&self, id: Uuid) -> StoreResult<Option<Professional>> {
        let rows = sqlx::query("SELECT * FROM professionals WHERE id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(self.load_professionals(rows).await?.into_iter().next())
    }

    async fn professionals_with_capability(
        &self,
        capability: Option<Capability>,
    ) -> StoreResult<Vec<Professional>> {
        let query = r#"
            SELECT * FROM professionals
            WHERE $1::TEXT IS NULL OR $1 = ANY(capabilities)
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(capability.map(|c| c.as_str()))
            .fetch_all(&self.pool)
            .await?;

        self.load_professionals(rows).await
    }

    async fn insert_match(&self, record: &Match) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO matches (id, project_id, professional_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (project_id, professional_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(record.id)
        .bind(record.project_id)
        .bind(record.professional_id)
        .bind(DbMatchStatus::from(record.status))
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            tx.rollback().await?;
            return Err(StoreError::Conflict {
                project_id: record.project_id,
                professional_id: record.professional_id,
            });
        }

        let score = &record.score;
        sqlx::query(
            r#"
            INSERT INTO match_scores (match_id, project_type_score, location_score, project_size_score,
                                      pricing_score, capability_score, verification_score, total_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(score.project_type_score)
        .bind(score.location_score)
        .bind(score.project_size_score)
        .bind(score.pricing_score)
        .bind(score.capability_score)
        .bind(score.verification_score)
        .bind(score.total_score)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_match(&self, id: Uuid) -> StoreResult<Option<Match>> {
        let query = format!(
            "SELECT {} FROM matches m JOIN match_scores s ON s.match_id = m.id WHERE m.id = $1",
            MATCH_COLUMNS
        );

        sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(Self::map_match)
            .transpose()
    }

    async fn matched_professionals(&self, project_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let rows = sqlx::query("SELECT professional_id FROM matches WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<Uuid, _>("professional_id").map_err(StoreError::from))
            .collect()
    }

    async fn matches_for_project(&self, project_id: Uuid, limit: usize) -> StoreResult<Vec<Match>> {
        let query = format!(
            "SELECT {} FROM matches m JOIN match_scores s ON s.match_id = m.id \
             WHERE m.project_id = $1 \
             ORDER BY s.total_score DESC, m.created_at ASC, m.professional_id ASC \
             LIMIT $2",
            MATCH_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(project_id)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::map_match).collect()
    }

    async fn matches_for_professional(
        &self,
        professional_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Match>> {
        let query = format!(
            "SELECT {} FROM matches m JOIN match_scores s ON s.match_id = m.id \
             WHERE m.professional_id = $1 \
             ORDER BY s.total_score DESC, m.created_at ASC, m.professional_id ASC \
             LIMIT $2",
            MATCH_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(professional_id)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::map_match).collect()
    }

    async fn update_match_score(&self, match_id: Uuid, score: &MatchScore) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE match_scores SET
                project_type_score = $2,
                location_score = $3,
                project_size_score = $4,
                pricing_score = $5,
                capability_score = $6,
                verification_score = $7,
                total_score = $8
            WHERE match_id = $1
            "#,
        )
        .bind(match_id)
        .bind(score.project_type_score)
        .bind(score.location_score)
        .bind(score.project_size_score)
        .bind(score.pricing_score)
        .bind(score.capability_score)
        .bind(score.verification_score)
        .bind(score.total_score)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE matches SET updated_at = NOW() WHERE id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_match_status(&self, match_id: Uuid, status: MatchStatus) -> StoreResult<()> {
        sqlx::query("UPDATE matches SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(match_id)
            .bind(DbMatchStatus::from(status))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
