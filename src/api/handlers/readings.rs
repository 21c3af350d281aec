//! Feed reading endpoints: history and manual refresh

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::DashboardState;
use crate::acquisition::history_or_fallback;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::defaults::FEED_MAX_RESULTS;
use crate::pipeline::refresh_once;
use crate::processing::compute_soil_health;
use crate::types::{Observation, SoilHealthResult};

/// An observation with its composite score.
#[derive(Debug, Serialize)]
pub struct ScoredObservation {
    pub observation: Observation,
    /// Absent if the reading could not be scored
    pub score: Option<SoilHealthResult>,
}

impl From<Observation> for ScoredObservation {
    fn from(observation: Observation) -> Self {
        let score = compute_soil_health(&observation.reading).ok();
        Self { observation, score }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub results: Option<usize>,
}

/// GET /api/v1/readings/history?results=N - Recent feed readings, each scored
///
/// `results` defaults to `feed.history_results` and is capped at 8000.
pub async fn get_history(
    State(state): State<DashboardState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    let results = query
        .results
        .unwrap_or(state.config.feed.history_results)
        .min(FEED_MAX_RESULTS);
    if results == 0 {
        return ApiErrorResponse::bad_request("results must be at least 1");
    }

    let history: Vec<ScoredObservation> = history_or_fallback(state.source.as_ref(), results)
        .await
        .into_iter()
        .map(ScoredObservation::from)
        .collect();
    ApiResponse::ok(history)
}

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    /// Wake the poller and return immediately instead of fetching inline.
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshQueued {
    pub queued: bool,
}

/// POST /api/v1/readings/refresh - Fetch the latest reading now
pub async fn refresh_readings(
    State(state): State<DashboardState>,
    query: Result<Query<RefreshQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    if query.background {
        state.refresh.notify_one();
        return ApiResponse::accepted(RefreshQueued { queued: true });
    }

    let observation = refresh_once(state.source.as_ref(), &state.app_state).await;
    ApiResponse::ok(ScoredObservation::from(observation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::create_test_state;
    use axum::http::StatusCode;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_updates_state() {
        let state = create_test_state();
        let resp = refresh_readings(State(state.clone()), Ok(Query(RefreshQuery { background: false }))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        assert_eq!(v["data"]["observation"]["origin"], "live");
        assert_eq!(v["data"]["score"]["label"], "Moderate");

        let app = state.app_state.read().await;
        assert_eq!(app.total_polls, 1);
        assert!(app.connected);
    }

    #[tokio::test]
    async fn test_background_refresh_is_queued() {
        let state = create_test_state();
        let resp = refresh_readings(State(state.clone()), Ok(Query(RefreshQuery { background: true }))).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(state.app_state.read().await.total_polls, 0);
    }

    #[tokio::test]
    async fn test_history_zero_is_bad_request() {
        let state = create_test_state();
        let resp = get_history(State(state), Ok(Query(HistoryQuery { results: Some(0) }))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_history_scores_each_entry() {
        let state = create_test_state();
        let resp = get_history(State(state), Ok(Query(HistoryQuery { results: None }))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        let entries = v["data"].as_array().unwrap();
        // The static source only holds one observation
        assert_eq!(entries.len(), 1);
        assert!(entries[0]["score"]["percent"].is_number());
    }
}
