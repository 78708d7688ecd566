// rest/routes/maintenance.rs — Maintenance schedule + plan routes.

use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::maintenance::{catalog, upcoming_maintenance, MaintenanceSummary, ServiceRecord};
use crate::observability::LatencyTracker;

pub async fn get_schedule() -> Json<Value> {
    Json(json!({ "schedule": catalog() }))
}

/// The vehicle descriptor sent by the web client. `make`/`model`/`year` are
/// accepted for logging and forward compatibility; the plan is mileage-only.
#[derive(Deserialize)]
pub struct VehicleDescriptor {
    pub mileage: i64,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct PlanRequest {
    pub vehicle: VehicleDescriptor,
    #[serde(default)]
    pub last_services: Vec<ServiceRecord>,
}

pub async fn plan(
    Json(body): Json<PlanRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // The planner itself accepts any integer; odometer validation is this
    // layer's job.
    if body.vehicle.mileage < 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "vehicle.mileage must be a non-negative integer" })),
        ));
    }

    let tracker = LatencyTracker::start("maintenance.plan");
    let upcoming = upcoming_maintenance(body.vehicle.mileage, &body.last_services);
    let summary = MaintenanceSummary::of(&upcoming);
    debug!(
        mileage = body.vehicle.mileage,
        history = body.last_services.len(),
        make = body.vehicle.make.as_deref().unwrap_or("-"),
        model = body.vehicle.model.as_deref().unwrap_or("-"),
        year = body.vehicle.year.unwrap_or(0),
        upcoming = upcoming.len(),
        "maintenance plan computed"
    );
    tracker.finish();

    Ok(Json(json!({
        "schedule": catalog(),
        "upcoming": upcoming,
        "summary": summary,
    })))
}
