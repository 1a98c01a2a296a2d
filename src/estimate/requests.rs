//! Request DTOs for the estimate API.
//!
//! Clients send loosely-typed JSON (numbers as strings, missing fields,
//! sometimes not even an object). Everything is coerced here into a fully
//! populated [`EstimateRequest`] so the calculators never see a bad value.

use rust_decimal::prelude::*;
use serde_json::{Map, Value};

/// Largest magnitude accepted for numeric inputs.
///
/// Matches the largest integer a JSON client can represent exactly; anything
/// bigger saturates so downstream arithmetic cannot overflow.
pub const MAX_INPUT_MAGNITUDE: i64 = 9_007_199_254_740_991;

pub const DEFAULT_MODE: &str = "generic";

/// Estimate request with every optional field resolved to its default
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRequest {
    /// Resolved service kind: `mode`, else `service`, else `"generic"`
    pub mode: String,
    /// Raw `service` field as sent
    pub service: String,
    pub inputs: EstimateInputs,
    pub notes: String,
    pub photo_summary: String,
}

/// Sizing inputs. Missing or malformed numbers are zero, strings are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateInputs {
    pub area_sq_ft: Decimal,
    pub shrub_count: Decimal,
    pub bed_size: String,
    pub material: String,
}

impl Default for EstimateRequest {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_string(),
            service: String::new(),
            inputs: EstimateInputs::default(),
            notes: String::new(),
            photo_summary: String::new(),
        }
    }
}

impl EstimateRequest {
    /// Build a request from any JSON value.
    ///
    /// Never fails: a non-object body yields the all-defaults request.
    pub fn from_value(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return Self::default();
        };

        let mode = coerce_string(obj.get("mode"));
        let service = coerce_string(obj.get("service"));

        let resolved_mode = if !mode.is_empty() {
            mode
        } else if !service.is_empty() {
            service.clone()
        } else {
            DEFAULT_MODE.to_string()
        };

        let inputs = obj
            .get("inputs")
            .and_then(Value::as_object)
            .map(EstimateInputs::from_map)
            .unwrap_or_default();

        Self {
            mode: resolved_mode,
            service,
            inputs,
            notes: coerce_string(obj.get("notes")),
            photo_summary: coerce_string(obj.get("photoSummary")),
        }
    }

    /// Echo of the request in its wire shape, used for activity records
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "mode": self.mode,
            "service": self.service,
            "inputs": {
                "areaSqFt": self.inputs.area_sq_ft.to_f64(),
                "shrubCount": self.inputs.shrub_count.to_f64(),
                "bedSize": self.inputs.bed_size,
                "material": self.inputs.material,
            },
            "notes": self.notes,
            "photoSummary": self.photo_summary,
        })
    }
}

impl EstimateInputs {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            area_sq_ft: coerce_number(map.get("areaSqFt")),
            shrub_count: coerce_number(map.get("shrubCount")),
            bed_size: coerce_string(map.get("bedSize")),
            material: coerce_string(map.get("material")),
        }
    }
}

/// Coerce a JSON value to a number, falling back to zero.
///
/// Accepts numbers, numeric strings (decimal or scientific) and booleans.
pub fn coerce_number(value: Option<&Value>) -> Decimal {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_str(s),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    raw.filter(|f| f.is_finite())
        .map(saturate)
        .unwrap_or(Decimal::ZERO)
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    // f64's parser accepts "inf"/"nan"; those are filtered as non-finite
    trimmed.parse::<f64>().ok()
}

fn saturate(f: f64) -> Decimal {
    let limit = MAX_INPUT_MAGNITUDE as f64;
    if f >= limit {
        Decimal::from(MAX_INPUT_MAGNITUDE)
    } else if f <= -limit {
        -Decimal::from(MAX_INPUT_MAGNITUDE)
    } else {
        Decimal::from_f64(f).unwrap_or(Decimal::ZERO)
    }
}

/// Coerce a JSON value to a string; numbers and booleans use their text form.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
