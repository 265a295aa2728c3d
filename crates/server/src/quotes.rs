//! Quote estimation and quote-request intake.
//!
//! - `POST /api/quotes`           store a quote request with the caller's estimate
//! - `POST /api/quotes/estimate`  advisory itemised estimate
//! - `GET  /api/pricing`          the loaded pricing table

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use ndawonga_core::domain::quote_request::QuoteSubmission;
use ndawonga_core::pricing::{clamp_area, estimate_with_trace, EstimateBreakdown, PricingTable};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{correlation_id, json_body, reject, ApiError};
use crate::state::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuoteSaved {
    pub id: i64,
    pub message: &'static str,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EstimateRequest {
    pub project_type: Option<String>,
    pub area_sq_m: Option<Decimal>,
    pub complexity: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingView {
    pub base_rates: BTreeMap<String, f64>,
    pub complexity_multipliers: BTreeMap<String, f64>,
    pub default_category: String,
    pub default_complexity: String,
    pub contingency_factor: f64,
}

impl From<&PricingTable> for PricingView {
    fn from(table: &PricingTable) -> Self {
        let as_floats = |map: &BTreeMap<String, Decimal>| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.to_f64().unwrap_or_default()))
                .collect()
        };
        Self {
            base_rates: as_floats(&table.base_rates),
            complexity_multipliers: as_floats(&table.complexity_multipliers),
            default_category: table.default_category.clone(),
            default_complexity: table.default_complexity.clone(),
            contingency_factor: table.contingency_factor.to_f64().unwrap_or_default(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes", post(submit_quote))
        .route("/api/quotes/estimate", post(estimate_quote))
        .route("/api/pricing", get(pricing))
}

pub async fn submit_quote(
    State(state): State<AppState>,
    body: Result<Json<QuoteSubmission>, JsonRejection>,
) -> Result<Json<QuoteSaved>, ApiError> {
    const EVENT: &str = "api.quote.submit_failed";
    let correlation_id = correlation_id();

    let submission = json_body(EVENT, &correlation_id, body)?;
    let request =
        submission.into_new_request().map_err(|error| reject(EVENT, &correlation_id, error))?;
    let project_type = request.project_type.clone().unwrap_or_default();

    let id = state
        .quotes
        .submit(request)
        .await
        .map_err(|error| reject(EVENT, &correlation_id, error))?;

    info!(
        event_name = "api.quote.submitted",
        correlation_id = %correlation_id,
        quote_request_id = id.0,
        project_type = %project_type,
        "quote request saved"
    );

    Ok(Json(QuoteSaved { id: id.0, message: "Quote request saved" }))
}

/// Advisory only; the result is never stored.
pub async fn estimate_quote(
    State(state): State<AppState>,
    body: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateBreakdown>, ApiError> {
    let correlation_id = correlation_id();
    let request = json_body("api.quote.estimate_failed", &correlation_id, body)?;

    let breakdown = estimate_with_trace(
        &state.pricing,
        request.project_type.as_deref().unwrap_or_default(),
        clamp_area(request.area_sq_m),
        request.complexity.as_deref().unwrap_or_default(),
    );

    Ok(Json(breakdown))
}

pub async fn pricing(State(state): State<AppState>) -> Json<PricingView> {
    Json(PricingView::from(state.pricing.as_ref()))
}
