use crate::error::StudioError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// JSON error body `{ error, kind }` with the status it maps to.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    kind: &'static str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            kind: "VALIDATION_ERROR",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            kind: "INTERNAL",
        }
    }

    /// A failed media fetch keeps the upstream status when there is one.
    pub fn from_fetch(error: StudioError) -> Self {
        match error {
            StudioError::UpstreamRejected { status, body } => Self {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!("Failed to fetch video: {}", body),
                kind: "UPSTREAM_REJECTED",
            },
            other => other.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StudioError> for ApiError {
    fn from(error: StudioError) -> Self {
        let status = match &error {
            StudioError::Validation(_) | StudioError::Base64(_) => StatusCode::BAD_REQUEST,
            StudioError::ConfigurationMissing => StatusCode::SERVICE_UNAVAILABLE,
            StudioError::UpstreamRejected { .. }
            | StudioError::MalformedResponse(_)
            | StudioError::Http(_) => StatusCode::BAD_GATEWAY,
            StudioError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            StudioError::GenerationFailed(_)
            | StudioError::Cancelled
            | StudioError::Encoding(_)
            | StudioError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
            kind: error.kind(),
        }
    }
}

/// Malformed request bodies get the same JSON error shape as every other failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: rejection.body_text(),
            kind: "VALIDATION_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, kind = self.kind, error = self.message.as_str(), "Request failed");
        }
        (
            self.status,
            Json(json!({
                "error": self.message,
                "kind": self.kind,
            })),
        )
            .into_response()
    }
}
