//! Response DTOs for the estimate API.

use serde::Serialize;

/// Quote returned by `POST /api/estimate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub price: i64,
    /// `"+<amount>"` suggested add-on value in whole dollars
    pub upsell: String,
    pub summary: String,
    pub close_pct: i32,
    pub upsell_pct: i32,
    pub risk_pct: i32,
}

/// Generic error body shared by all API routes
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
