//! Current rate schedule endpoint.

use axum::{extract::State, response::Json, routing::get, Router};
use calc_core::RateStep;

use super::{ApiError, AppState};

/// Build the rates routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rates", get(rates_handler))
}

/// GET /rates - The current schedule snapshot, refreshed first when stale.
///
/// Serialises steps with their wire names (`date_from`, `key_rate`). An
/// ingestion failure maps to 503 carrying the underlying error text.
async fn rates_handler(State(state): State<AppState>) -> Result<Json<Vec<RateStep>>, ApiError> {
    let schedule = state
        .rates
        .refresh_if_stale()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(schedule.steps().to_vec()))
}
