//! Estimate route handler

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use super::calculators::calculate_estimate;
use super::requests::EstimateRequest;
use super::responses::EstimateResponse;
use crate::activity::{self, ActivityEntry};
use crate::error::{AppError, Result};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/estimate", post(create_estimate))
}

/// Parse a JSON body; an empty body counts as `{}`.
pub(crate) fn parse_json_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Malformed JSON body: {e}")))
}

/// Quote a service request and record it in the activity log
pub async fn create_estimate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EstimateResponse>> {
    let payload = parse_json_body(&body)?;
    let request = EstimateRequest::from_value(&payload);

    let response = std::panic::catch_unwind(|| calculate_estimate(&request))
        .map_err(|_| AppError::Internal(format!("Estimate failed for mode '{}'", request.mode)))?;

    info!(
        mode = %request.mode,
        price = response.price,
        close_pct = response.close_pct,
        upsell_pct = response.upsell_pct,
        risk_pct = response.risk_pct,
        "Estimate computed"
    );

    activity::record_in_background(
        state.events.clone(),
        ActivityEntry::new(
            "estimate",
            json!({ "request": request.to_value(), "response": &response }),
        ),
    );

    Ok(Json(response))
}
