use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::EngineError;
use crate::models::{ComputeFarRequest, FeasibilityRequest, PaymentEvent, PlotFarRequest};
use crate::routes::{optional_json, AppState};

/// Configure zoning, feasibility and payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/far", web::post().to(compute_far))
        .route("/plots/{plot_id}/far", web::post().to(compute_plot_far))
        .route("/plots/{plot_id}/far", web::get().to(latest_far))
        .route("/plots/{plot_id}/feasibility", web::post().to(compute_feasibility))
        .route("/plots/{plot_id}/feasibility", web::get().to(latest_feasibility))
        .route("/plots/{plot_id}/feasibility/unlock", web::post().to(unlock_feasibility))
        .route("/payments/events", web::post().to(payment_event));
}

/// Standalone FAR calculation
///
/// POST /api/v1/far
///
/// Request body:
/// ```json
/// {
///   "plotAreaSqft": 1200.0,
///   "roadWidthFt": 35.0,
///   "zoneType": "Residential",
///   "city": "Bengaluru"
/// }
/// ```
async fn compute_far(
    state: web::Data<AppState>,
    req: web::Json<ComputeFarRequest>,
) -> Result<HttpResponse, EngineError> {
    req.validate()?;

    let result = state.feasibility.compute_far(
        req.plot_area_sqft,
        req.road_width_ft,
        req.zone_type.as_deref(),
        req.city.as_deref(),
    );
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/v1/plots/{plot_id}/far
async fn compute_plot_far(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, EngineError> {
    let req: PlotFarRequest = optional_json(&body)?;
    req.validate()?;

    let record = state
        .feasibility
        .compute_far_for_plot(path.into_inner(), req.road_width_ft, req.zone_type.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// GET /api/v1/plots/{plot_id}/far
async fn latest_far(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let record = state.feasibility.latest_far(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Assemble a feasibility report
///
/// POST /api/v1/plots/{plot_id}/feasibility
///
/// Without `totalBuildableAreaSqft` the plot's latest FAR result is used.
async fn compute_feasibility(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, EngineError> {
    let plot_id = path.into_inner();
    let req: FeasibilityRequest = optional_json(&body)?;
    req.validate()?;

    let report = match req.total_buildable_area_sqft {
        Some(total) => state.feasibility.compute_feasibility(plot_id, total).await?,
        None => {
            state
                .feasibility
                .compute_feasibility_from_latest_far(plot_id)
                .await?
        }
    };
    Ok(HttpResponse::Created().json(report))
}

/// GET /api/v1/plots/{plot_id}/feasibility
async fn latest_feasibility(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let report = state.feasibility.latest_feasibility(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /api/v1/plots/{plot_id}/feasibility/unlock
async fn unlock_feasibility(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, EngineError> {
    let report = state.feasibility.unlock_feasibility(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Payment collaborator callback
///
/// POST /api/v1/payments/events
async fn payment_event(
    state: web::Data<AppState>,
    event: web::Json<PaymentEvent>,
) -> Result<HttpResponse, EngineError> {
    let outcome = state.feasibility.apply_payment_event(&event).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
