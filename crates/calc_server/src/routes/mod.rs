//! Route modules for the calculation server.
//!
//! This module contains endpoint group-specific routers:
//! - calc: statutory interest calculation
//! - rates: current rate schedule snapshot
//! - health: liveness and configuration presence

pub mod calc;
pub mod health;
pub mod rates;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use adapter_rates::RatesProvider;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Rate schedule store; single source of truth for rate data.
    pub rates: Arc<RatesProvider>,
    /// Server start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(config: Arc<ServerConfig>, rates: Arc<RatesProvider>) -> Self {
        Self {
            config,
            rates,
            start_time: std::time::Instant::now(),
        }
    }
}

/// JSON body of error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Errors a handler surfaces to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters; rejected before reaching the core.
    BadRequest(String),
    /// Rate data unavailable: ingestion failed or the schedule is empty.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::ServiceUnavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", message)
            }
        };
        let body = ErrorBody {
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the main application router by merging all route modules.
pub fn build_router(config: Arc<ServerConfig>, rates: Arc<RatesProvider>) -> Router {
    let state = AppState::new(config, rates);

    Router::new()
        .merge(health::routes())
        .merge(rates::routes())
        .merge(calc::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = Arc::new(ServerConfig::default());
        let rates = Arc::new(RatesProvider::new(None).unwrap());
        build_router(config, rates)
    }

    #[tokio::test]
    async fn test_build_router_serves_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_merges_all_route_groups() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/rates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Unconfigured provider: empty schedule answers 503 on /calc395.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/calc395?amount=1000&start_date=2024-01-01&end_date=2024-02-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/unknown/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_error_bodies() {
        let response = ApiError::BadRequest("amount must be positive".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "bad_request");
        assert_eq!(parsed.message, "amount must be positive");
    }
}
