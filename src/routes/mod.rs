// Route exports
pub mod feasibility;
pub mod intake;
pub mod matches;

use actix_web::{web, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::error::EngineError;
use crate::models::HealthResponse;
use crate::services::{EngineStore, FeasibilityService, MatchingService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feasibility: FeasibilityService,
    pub matching: MatchingService,
    pub store: Arc<dyn EngineStore>,
    pub limits: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(intake::configure)
            .configure(feasibility::configure)
            .configure(matches::configure),
    );
}

/// Decode an optional JSON body. Only an empty body counts as absent.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, EngineError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| EngineError::InvalidBody(e.to_string()))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
