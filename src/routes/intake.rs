use actix_web::{web, HttpResponse};

use crate::error::EngineError;
use crate::models::{PidVerification, Plot, Professional, Project};
use crate::routes::AppState;

/// Registration of the records the engine evaluates
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/plots", web::post().to(register_plot))
        .route("/pid-verifications", web::post().to(register_pid_verification))
        .route("/projects", web::post().to(register_project))
        .route("/professionals", web::post().to(register_professional));
}

/// POST /api/v1/plots
async fn register_plot(
    state: web::Data<AppState>,
    body: web::Json<Plot>,
) -> Result<HttpResponse, EngineError> {
    let plot = state.feasibility.register_plot(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(plot))
}

/// POST /api/v1/pid-verifications
async fn register_pid_verification(
    state: web::Data<AppState>,
    body: web::Json<PidVerification>,
) -> Result<HttpResponse, EngineError> {
    let verification = state
        .feasibility
        .register_pid_verification(body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(verification))
}

/// POST /api/v1/projects
async fn register_project(
    state: web::Data<AppState>,
    body: web::Json<Project>,
) -> Result<HttpResponse, EngineError> {
    let project = state.matching.register_project(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

/// POST /api/v1/professionals
async fn register_professional(
    state: web::Data<AppState>,
    body: web::Json<Professional>,
) -> Result<HttpResponse, EngineError> {
    let professional = state
        .matching
        .register_professional(body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(professional))
}
