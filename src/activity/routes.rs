//! Activity log route handlers

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ActivityEntry, MAX_ENTRIES};
use crate::error::Result;
use crate::estimate::routes::parse_json_body;
use crate::AppState;

const DEFAULT_EVENT: &str = "client";
const DEFAULT_LIMIT: usize = 50;

/// Query parameters for reading the log.
///
/// `limit` is kept as raw text so a malformed value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub limit: Option<String>,
}

impl LogQuery {
    /// Requested window size, capped at the log's retention
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_ENTRIES)
    }
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub entries: Vec<ActivityEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/log", post(record).get(list))
}

/// Record a client-side event.
///
/// Accepts `{ "event": "...", "data": ... }`; a body without `data` is
/// stored whole. Store failures are logged, never returned.
pub async fn record(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    let payload = parse_json_body(&body)?;

    let event = payload
        .get("event")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(DEFAULT_EVENT)
        .to_string();
    let data = payload.get("data").cloned().unwrap_or(payload);

    if let Err(e) = state.events.record_event(ActivityEntry::new(&event, data)).await {
        tracing::warn!(event = %event, error = %e, "Failed to record client activity");
    }

    Ok((StatusCode::ACCEPTED, Json(json!({ "ok": true }))))
}

/// Most recent entries, oldest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogListResponse>> {
    let limit = query.limit();
    let entries = state.events.recent(limit).await?;
    Ok(Json(LogListResponse { entries }))
}
