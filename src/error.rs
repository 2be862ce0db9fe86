//! Error taxonomy shared by every layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("no API credential configured")]
    ConfigurationMissing,

    #[error("API Error: {status} - {body}")]
    UpstreamRejected { status: u16, body: String },

    #[error("Timeout waiting for video generation after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("generation was cancelled")]
    Cancelled,

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("{0}")]
    Validation(String),

    #[error("unexpected upstream response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl StudioError {
    /// Stable tag attached to fallback responses and error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            StudioError::ConfigurationMissing => "CONFIGURATION_MISSING",
            StudioError::UpstreamRejected { .. } if self.is_api_not_enabled() => "API_NOT_ENABLED",
            StudioError::UpstreamRejected { .. } => "UPSTREAM_REJECTED",
            StudioError::Timeout { .. } => "TIMEOUT",
            StudioError::GenerationFailed(_) => "GENERATION_FAILED",
            StudioError::Cancelled => "CANCELLED",
            StudioError::Encoding(_) => "ENCODING_ERROR",
            StudioError::Validation(_) | StudioError::Base64(_) => "VALIDATION_ERROR",
            StudioError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            StudioError::Http(_) => "TRANSPORT_ERROR",
            StudioError::Io(_) => "IO_ERROR",
        }
    }

    /// The upstream project has never enabled the called API.
    pub fn is_api_not_enabled(&self) -> bool {
        matches!(self, StudioError::UpstreamRejected { body, .. } if body.contains("has not been used"))
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(StudioError::Timeout { attempts: 3 }.kind(), "TIMEOUT");
        assert_eq!(StudioError::ConfigurationMissing.kind(), "CONFIGURATION_MISSING");
        assert_eq!(
            StudioError::Validation("Missing text".into()).kind(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            StudioError::UpstreamRejected {
                status: 500,
                body: "boom".into()
            }
            .kind(),
            "UPSTREAM_REJECTED"
        );
    }

    #[test]
    fn test_api_not_enabled_is_detected() {
        let err = StudioError::UpstreamRejected {
            status: 403,
            body: "Cloud Text-to-Speech API has not been used in project 42".into(),
        };
        assert!(err.is_api_not_enabled());
        assert_eq!(err.kind(), "API_NOT_ENABLED");
    }

    #[test]
    fn test_upstream_message_format() {
        let err = StudioError::UpstreamRejected {
            status: 429,
            body: "quota".into(),
        };
        assert_eq!(err.to_string(), "API Error: 429 - quota");
    }
}
