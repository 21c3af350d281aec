//! `/api/v1` response envelope.
//!
//! Success bodies are `{ "data": T, "meta": {..} }`, failures are
//! `{ "error": { "code", "message" }, "meta": {..} }`. Handlers return
//! `Response` directly so a single handler can produce either shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope version reported in `meta.version`.
pub const API_VERSION: &str = "1";

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl ResponseMeta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            version: API_VERSION,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        Self::respond(StatusCode::OK, data)
    }

    /// 202: work was queued, `data` describes what.
    pub fn accepted(data: T) -> Response {
        Self::respond(StatusCode::ACCEPTED, data)
    }

    fn respond(status: StatusCode, data: T) -> Response {
        let envelope = Self {
            data,
            meta: ResponseMeta::now(),
        };
        (status, Json(envelope)).into_response()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Machine-readable failure class. Serialized as `"INVALID_INPUT"` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body or query string could not be decoded.
    BadRequest,
    /// A reading held NaN or an infinity.
    InvalidInput,
    InternalError,
    /// Nothing to serve yet (no poll has completed).
    ServiceUnavailable,
}

impl ErrorCode {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    pub fn respond(code: ErrorCode, message: impl Into<String>) -> Response {
        let envelope = Self {
            error: ErrorDetail {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::now(),
        };
        (code.status(), Json(envelope)).into_response()
    }

    pub fn bad_request(message: impl Into<String>) -> Response {
        Self::respond(ErrorCode::BadRequest, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Response {
        Self::respond(ErrorCode::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Response {
        Self::respond(ErrorCode::InternalError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Response {
        Self::respond(ErrorCode::ServiceUnavailable, message)
    }
}
