//! API route definitions
//!
//! - /api/v1/soil-health - Score a reading (POST JSON or GET query)
//! - /api/v1/soil-health/latest - Score of the latest feed reading
//! - /api/v1/readings/history - Recent feed readings, scored
//! - /api/v1/readings/refresh - Fetch from the feed now
//! - /api/v1/status - Feed connection status
//! - /api/v1/config - Active config and validation

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, DashboardState};

/// Create all `/api/v1` routes
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route(
            "/soil-health",
            post(handlers::score_reading).get(handlers::score_reading_query),
        )
        .route("/soil-health/latest", get(handlers::get_latest))
        .route("/readings/history", get(handlers::get_history))
        .route("/readings/refresh", post(handlers::refresh_readings))
        .route("/status", get(handlers::get_status))
        .route("/config", get(handlers::get_config))
        .route("/config/validate", post(handlers::validate_config))
        .with_state(state)
}

/// Liveness endpoint at root level
pub fn root_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
