//! Config inspection and validation endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::DashboardState;
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::validation::validate_ranges;
use crate::config::{AppConfig, ValidationWarning};

/// GET /api/v1/config - Active configuration with the feed API key masked
pub async fn get_config(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.config.redacted())
}

/// Result of validating a candidate configuration
#[derive(Debug, Serialize)]
pub struct ValidateConfigResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

/// POST /api/v1/config/validate - Check a config without applying it
///
/// Missing sections take their defaults, as in a TOML file.
pub async fn validate_config(body: Result<Json<AppConfig>, JsonRejection>) -> Response {
    let config = match body {
        Ok(Json(config)) => config,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    let (errors, warnings) = validate_ranges(&config);
    ApiResponse::ok(ValidateConfigResponse {
        valid: errors.is_empty(),
        errors,
        warnings,
    })
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
    async fn test_get_config_redacts_key() {
        let mut state = create_test_state();
        let mut config = AppConfig::default();
        config.feed.read_api_key = "SECRETKEY".to_string();
        state.config = std::sync::Arc::new(config);

        let v = body_json(get_config(State(state)).await).await;
        assert_ne!(v["data"]["feed"]["read_api_key"], "SECRETKEY");
        assert_eq!(v["data"]["feed"]["poll_interval_secs"], 120);
    }

    #[tokio::test]
    async fn test_validate_reports_errors() {
        let mut config = AppConfig::default();
        config.feed.default_soil_ph = 15.0;
        let resp = validate_config(Ok(Json(config))).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let v = body_json(resp).await;
        assert_eq!(v["data"]["valid"], false);
        assert!(v["data"]["errors"][0].as_str().unwrap().contains("default_soil_ph"));
    }

    #[tokio::test]
    async fn test_validate_accepts_defaults() {
        let v = body_json(validate_config(Ok(Json(AppConfig::default()))).await).await;
        assert_eq!(v["data"]["valid"], true);
        assert!(v["data"]["errors"].as_array().unwrap().is_empty());
    }
}
