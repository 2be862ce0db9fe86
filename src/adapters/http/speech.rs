use super::error::ApiError;
use super::extract::ApiJson;
use super::state::AppState;
use crate::domain::generation::GenerationMode;
use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    /// Base64 encoded audio file.
    pub audio_content: String,
    pub mode: GenerationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

pub async fn generate_speech(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let outcome = state.speech.synthesize(&request.text).await?;
    Ok(Json(SpeechResponse {
        audio_content: STANDARD.encode(&outcome.audio),
        mode: outcome.mode,
        error: outcome.error,
        error_kind: outcome.error_kind,
    }))
}
