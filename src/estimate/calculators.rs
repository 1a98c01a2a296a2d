//! Core estimate calculation functions.
//!
//! Pure functions for quote math - no I/O, no clock, no randomness.
//! Identical requests always produce identical responses.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::estimate::requests::{EstimateInputs, EstimateRequest};
use crate::estimate::responses::EstimateResponse;

/// Floor applied to every quoted price
pub const MIN_PRICE: Decimal = dec!(45);

const GENERIC_BASE: Decimal = dec!(75);

const MOWING_FLAT: Decimal = dec!(45);
const MOWING_SETUP: Decimal = dec!(25);
const MOWING_RATE_PER_SQ_FT: Decimal = dec!(0.03);
const MOWING_MIN: Decimal = dec!(35);
const MOWING_MAX: Decimal = dec!(125);

const LANDSCAPING_BASE: Decimal = dec!(120);
const LANDSCAPING_PER_SHRUB: Decimal = dec!(6);
const PREMIUM_MATERIAL_MULTIPLIER: Decimal = dec!(1.25);

const DEFAULT_CLOSE_PCT: i32 = 72;
const DEFAULT_UPSELL_PCT: i32 = 40;
const DEFAULT_RISK_PCT: i32 = 18;

const ROUGH_SITE_KEYWORDS: [&str; 3] = ["overgrown", "patchy", "neglected"];
const TIDY_SITE_KEYWORDS: [&str; 3] = ["clean", "fresh", "sharp"];
// Pricing and upsell scan for different material keywords
const PREMIUM_PRICE_KEYWORDS: [&str; 2] = ["premium", "stone"];
const PREMIUM_UPSELL_KEYWORDS: [&str; 2] = ["premium", "rock"];

const UPSELL_SENTENCE: &str =
    "Good upsell window: offer edging or a mulch refresh as an add-on.";
const RELIABILITY_SENTENCE: &str = "Lead with reliability and an on-time, tidy finish.";
const RISK_SENTENCE: &str =
    "Risk flag: site condition may add labor, so confirm scope before committing.";
const CLEAN_SETUP_SENTENCE: &str = "Setup looks straightforward with low rework risk.";

/// Service kind resolved from the request's `mode`.
///
/// Matching is exact and case-sensitive; anything unrecognised is `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Mowing,
    Landscaping,
    Generic,
}

impl ServiceKind {
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "mowing" => ServiceKind::Mowing,
            "landscaping" => ServiceKind::Landscaping,
            _ => ServiceKind::Generic,
        }
    }
}

/// Heuristic sales scores, each clamped to its own range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub close_pct: i32,
    pub upsell_pct: i32,
    pub risk_pct: i32,
}

impl Scores {
    fn clamped(self) -> Self {
        Self {
            close_pct: self.close_pct.clamp(5, 98),
            upsell_pct: self.upsell_pct.clamp(5, 98),
            risk_pct: self.risk_pct.clamp(3, 95),
        }
    }
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            close_pct: DEFAULT_CLOSE_PCT,
            upsell_pct: DEFAULT_UPSELL_PCT,
            risk_pct: DEFAULT_RISK_PCT,
        }
    }
}

/// Round to a whole number, halves away from zero.
///
/// Unlike the banker's rounding used for money splits, quotes round .5 up so
/// a client sees `$48` for `47.5`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_web::estimate::round_whole;
///
/// assert_eq!(round_whole(dec!(47.5)), dec!(48));
/// assert_eq!(round_whole(dec!(47.49)), dec!(47));
/// ```
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Pre-adjustment price for a service kind and its sizing inputs.
pub fn base_price(kind: ServiceKind, inputs: &EstimateInputs) -> Decimal {
    match kind {
        ServiceKind::Generic => GENERIC_BASE,
        ServiceKind::Mowing => {
            if inputs.area_sq_ft > Decimal::ZERO {
                (MOWING_SETUP + inputs.area_sq_ft * MOWING_RATE_PER_SQ_FT)
                    .clamp(MOWING_MIN, MOWING_MAX)
            } else {
                MOWING_FLAT
            }
        }
        ServiceKind::Landscaping => {
            let mut total = LANDSCAPING_BASE
                + bed_surcharge(&inputs.bed_size)
                + inputs.shrub_count * LANDSCAPING_PER_SHRUB;

            if contains_any(&inputs.material.to_lowercase(), &PREMIUM_PRICE_KEYWORDS) {
                total *= PREMIUM_MATERIAL_MULTIPLIER;
            }
            total
        }
    }
}

/// Fixed surcharge for a landscaping bed size. Unknown sizes add nothing.
pub fn bed_surcharge(bed_size: &str) -> Decimal {
    match bed_size {
        "small" => dec!(60),
        "medium" => dec!(140),
        "large" => dec!(260),
        _ => Decimal::ZERO,
    }
}

/// Final whole-dollar price: the base floored at [`MIN_PRICE`], then rounded.
pub fn final_price(base: Decimal) -> i64 {
    round_whole(base.max(MIN_PRICE)).to_i64().unwrap_or(i64::MAX)
}

/// Apply keyword signals from notes, photo summary and material.
///
/// Each signal is an independent toggle; all that match are applied before
/// the scores are clamped. Notes and photo summary are searched as one
/// string with nothing between them.
pub fn score_signals(notes: &str, photo_summary: &str, material: &str) -> Scores {
    let mut scores = Scores::default();
    let text = format!("{}{}", notes.to_lowercase(), photo_summary.to_lowercase());

    if contains_any(&text, &ROUGH_SITE_KEYWORDS) {
        scores.risk_pct += 18;
        scores.upsell_pct += 16;
    }
    if contains_any(&text, &TIDY_SITE_KEYWORDS) {
        scores.close_pct += 10;
    }
    if contains_any(&material.to_lowercase(), &PREMIUM_UPSELL_KEYWORDS) {
        scores.upsell_pct += 20;
    }

    scores.clamped()
}

/// Suggested add-on value: `upsell_pct` percent of the price, rounded.
pub fn upsell_amount(price: i64, upsell_pct: i32) -> i64 {
    let amount = Decimal::from(price) * Decimal::from(upsell_pct) / dec!(100);
    round_whole(amount).to_i64().unwrap_or(0)
}

/// Three-sentence narrative for the quote.
pub fn build_summary(price: i64, scores: &Scores) -> String {
    let pitch = if scores.upsell_pct > 40 {
        UPSELL_SENTENCE
    } else {
        RELIABILITY_SENTENCE
    };
    let site = if scores.risk_pct > 35 {
        RISK_SENTENCE
    } else {
        CLEAN_SETUP_SENTENCE
    };
    format!("Estimate: ~${price}. {pitch} {site}")
}

/// Compute the full quote for a request.
pub fn calculate_estimate(request: &EstimateRequest) -> EstimateResponse {
    let kind = ServiceKind::from_mode(&request.mode);
    let price = final_price(base_price(kind, &request.inputs));
    let scores = score_signals(
        &request.notes,
        &request.photo_summary,
        &request.inputs.material,
    );

    EstimateResponse {
        price,
        upsell: format!("+{}", upsell_amount(price, scores.upsell_pct)),
        summary: build_summary(price, &scores),
        close_pct: scores.close_pct,
        upsell_pct: scores.upsell_pct,
        risk_pct: scores.risk_pct,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
