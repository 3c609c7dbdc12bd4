//! Error-to-status mapping for the coaching API
//!
//! Every non-2xx body carries a stable machine tag plus a human-readable
//! message. InvalidRequest detail is shown verbatim; model failures are
//! surfaced generically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::errors::CoachError;

/// A client-facing failure with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn missing_credential() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "credential_missing",
            message: "Missing bearer credential. Sign in again.".to_string(),
        }
    }

    pub fn invalid_credential() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "credential_invalid",
            message: "Credential expired or invalid. Sign in again.".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn machine_tag(&self) -> &'static str {
        self.error
    }
}

impl From<CoachError> for ApiError {
    fn from(e: CoachError) -> Self {
        let status = match &e {
            CoachError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CoachError::DataUnavailable(_) => StatusCode::NOT_FOUND,
            CoachError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            CoachError::SchemaViolation(_) | CoachError::UpstreamError(_) => {
                StatusCode::BAD_GATEWAY
            }
            CoachError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            error: e.machine_tag(),
            message: e.user_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.error,
                "message": self.message,
            })),
        )
            .into_response()
    }
}
