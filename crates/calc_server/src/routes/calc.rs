//! Statutory interest calculation endpoint.

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use calc_core::{statutory_interest, DayCountBasis, InterestBreakdown};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApiError, AppState};

/// Query parameters of `GET /calc395`.
#[derive(Debug, Deserialize)]
pub struct CalcParams {
    /// Principal amount; must be positive.
    pub amount: f64,
    /// Start date, inclusive (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// End date (YYYY-MM-DD); exclusive unless `end_inclusive` is set.
    pub end_date: NaiveDate,
    /// Include the end date in the calculation.
    #[serde(default)]
    pub end_inclusive: bool,
    /// Day count basis: `365` or `ACT/365` (identical behaviour).
    #[serde(default)]
    pub day_count: DayCountBasis,
}

/// Build the calculation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/calc395", get(calc_handler))
}

/// GET /calc395 - Interest broken down per rate-validity segment.
///
/// The period is `[start_date, end_date)`; `end_inclusive=true` adds exactly
/// one calendar day before any other processing. An empty or inverted range
/// is a valid zero result. An empty schedule is a service-unavailable
/// condition, never a silent zero.
async fn calc_handler(
    State(state): State<AppState>,
    Query(params): Query<CalcParams>,
) -> Result<Json<InterestBreakdown>, ApiError> {
    if !params.amount.is_finite() || params.amount <= 0.0 {
        return Err(ApiError::BadRequest("amount must be positive".to_string()));
    }

    let mut end_date = params.end_date;
    if params.end_inclusive {
        end_date = end_date
            .succ_opt()
            .ok_or_else(|| ApiError::BadRequest("end_date is out of range".to_string()))?;
    }
    if end_date <= params.start_date {
        return Ok(Json(InterestBreakdown::default()));
    }

    let schedule = state
        .rates
        .refresh_if_stale()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;
    if schedule.is_empty() {
        return Err(ApiError::ServiceUnavailable(
            "no key-rate data available; configure a rates source with columns date_from, key_rate"
                .to_string(),
        ));
    }

    let result = statutory_interest(
        params.amount,
        params.start_date,
        end_date,
        &schedule,
        params.day_count,
    );
    Ok(Json(result))
}
