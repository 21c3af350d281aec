//! Soil Health Index endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::processing::build_report;
use crate::types::{Observation, SensorReading, SoilHealthReport};

fn score(reading: &SensorReading) -> Response {
    match build_report(reading) {
        Ok(report) => ApiResponse::ok(report),
        Err(e) => ApiErrorResponse::invalid_input(e.to_string()),
    }
}

/// POST /api/v1/soil-health - Score a reading supplied as JSON
pub async fn score_reading(body: Result<Json<SensorReading>, JsonRejection>) -> Response {
    match body {
        Ok(Json(reading)) => score(&reading),
        Err(rejection) => ApiErrorResponse::bad_request(rejection.body_text()),
    }
}

/// GET /api/v1/soil-health?nitrogen=..&... - Score a reading supplied as query parameters
///
/// Query strings can carry `NaN` and `inf`, which JSON cannot.
pub async fn score_reading_query(
    query: Result<Query<SensorReading>, axum::extract::rejection::QueryRejection>,
) -> Response {
    match query {
        Ok(Query(reading)) => score(&reading),
        Err(rejection) => ApiErrorResponse::bad_request(rejection.body_text()),
    }
}

/// Latest polled observation with its score
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub observation: Observation,
    pub report: SoilHealthReport,
    /// False when the observation is demo data
    pub connected: bool,
}

/// GET /api/v1/soil-health/latest - Score of the most recent feed reading
pub async fn get_latest(State(state): State<DashboardState>) -> Response {
    let app_state = state.app_state.read().await;
    match (&app_state.latest, &app_state.latest_report) {
        (Some(observation), Some(report)) => ApiResponse::ok(LatestResponse {
            observation: observation.clone(),
            report: report.clone(),
            connected: app_state.connected,
        }),
        (Some(_), None) => ApiErrorResponse::internal("Latest reading could not be scored"),
        (None, _) => ApiErrorResponse::service_unavailable("No reading received yet"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::create_test_state;
    use crate::types::{HealthLabel, Observation};
    use axum::http::StatusCode;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_score_demo_reading() {
        let reading = crate::acquisition::demo_reading();
        let resp = score_reading(Ok(Json(reading))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        assert_eq!(v["data"]["result"]["label"], "Moderate");
        assert_eq!(v["data"]["display_percent"], 56);
        assert_eq!(v["data"]["factors"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_non_finite_query_is_invalid_input() {
        let mut reading = crate::acquisition::demo_reading();
        reading.soil_ph = f64::NAN;
        let resp = score_reading_query(Ok(Query(reading))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "INVALID_INPUT");
        assert!(v["error"]["message"].as_str().unwrap().contains("soil_ph"));
    }

    #[tokio::test]
    async fn test_latest_unavailable_before_first_poll() {
        let state = create_test_state();
        let resp = get_latest(State(state)).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_latest_after_poll() {
        let state = create_test_state();
        state.app_state.write().await.record_live(Observation::live(
            crate::acquisition::demo_reading(),
            chrono::Utc::now(),
        ));

        let resp = get_latest(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["data"]["connected"], true);
        assert_eq!(v["data"]["observation"]["origin"], "live");
        let label: HealthLabel =
            serde_json::from_value(v["data"]["report"]["result"]["label"].clone()).unwrap();
        assert_eq!(label, HealthLabel::Moderate);
    }
}
