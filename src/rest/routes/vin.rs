// rest/routes/vin.rs — VIN decode proxy route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::vehicle::VehicleDataError;
use crate::AppContext;

pub async fn decode_vin(
    State(ctx): State<Arc<AppContext>>,
    Path(vin): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.vehicle_data.decode(&vin).await {
        Ok(profile) => Ok(Json(json!({ "vehicle": profile }))),
        Err(e @ VehicleDataError::InvalidVin) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )),
        Err(e) => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}
