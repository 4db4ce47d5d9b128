use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::EngineError;
use crate::models::{MatchListQuery, MatchListResponse};
use crate::routes::AppState;

/// Configure publishing and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects/{project_id}/publish", web::post().to(publish_project))
        .route("/projects/{project_id}/matches/refresh", web::post().to(refresh_scores))
        .route("/projects/{project_id}/matches", web::get().to(project_matches))
        .route("/professionals/{professional_id}/matches", web::get().to(professional_matches))
        .route("/matches/{match_id}/accept", web::post().to(accept_match))
        .route("/matches/{match_id}/reject", web::post().to(reject_match));
}

/// Publish a project and run its match batch
///
/// POST /api/v1/projects/{project_id}/publish
async fn publish_project(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let project_id = path.into_inner();
    tracing::info!("Publishing project {}", project_id);

    let response = state.matching.publish_and_match(project_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/v1/projects/{project_id}/matches/refresh
async fn refresh_scores(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let matches = state.matching.refresh_scores(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MatchListResponse {
        total_results: matches.len(),
        matches,
    }))
}

/// Ranked matches of a project
///
/// GET /api/v1/projects/{project_id}/matches?limit=20
async fn project_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchListQuery>,
) -> Result<HttpResponse, EngineError> {
    query.validate()?;
    let limit = state.limits.resolve_limit(query.limit);

    let matches = state.matching.project_matches(path.into_inner(), limit).await?;
    Ok(HttpResponse::Ok().json(MatchListResponse {
        total_results: matches.len(),
        matches,
    }))
}

/// Ranked matches of a professional
///
/// GET /api/v1/professionals/{professional_id}/matches?limit=20
async fn professional_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchListQuery>,
) -> Result<HttpResponse, EngineError> {
    query.validate()?;
    let limit = state.limits.resolve_limit(query.limit);

    let matches = state
        .matching
        .professional_matches(path.into_inner(), limit)
        .await?;
    Ok(HttpResponse::Ok().json(MatchListResponse {
        total_results: matches.len(),
        matches,
    }))
}

/// POST /api/v1/matches/{match_id}/accept
async fn accept_match(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let record = state.matching.accept_match(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/v1/matches/{match_id}/reject
async fn reject_match(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let record = state.matching.reject_match(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}
