//! Service state endpoints: liveness and feed status

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::ApiResponse;
use crate::types::HealthLabel;

// ============================================================================
// Liveness
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// GET /health - Liveness probe (unwrapped)
pub async fn health_check(State(state): State<DashboardState>) -> Json<LivenessResponse> {
    let app_state = state.app_state.read().await;
    Json(LivenessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: app_state.uptime_secs(),
    })
}

// ============================================================================
// Feed Status
// ============================================================================

/// Feed and scoring status for the dashboard header
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub farm_name: String,
    pub source: String,
    /// True when the last fetch returned live data
    pub connected: bool,
    pub total_polls: u64,
    pub failed_polls: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub poll_interval_secs: u64,
    pub uptime_seconds: u64,
    /// Latest health score, rounded for display
    pub latest_percent: Option<u8>,
    pub latest_label: Option<HealthLabel>,
}

/// GET /api/v1/status - Feed connection and poll counters
pub async fn get_status(State(state): State<DashboardState>) -> Response {
    let s = state.app_state.read().await;
    ApiResponse::ok(StatusResponse {
        farm_name: s.farm_name.clone(),
        source: s.source_name.clone(),
        connected: s.connected,
        total_polls: s.total_polls,
        failed_polls: s.failed_polls,
        consecutive_failures: s.consecutive_failures,
        last_error: s.last_error.clone(),
        last_update: s.last_update,
        poll_interval_secs: s.poll_interval_secs,
        uptime_seconds: s.uptime_secs(),
        latest_percent: s.latest_report.as_ref().map(|r| r.display_percent),
        latest_label: s.latest_report.as_ref().map(|r| r.result.label),
    })
}
