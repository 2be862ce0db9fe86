use super::error::ApiError;
use super::extract::ApiJson;
use super::state::AppState;
use crate::domain::generation::VideoOutcome;
use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    #[serde(default)]
    pub prompt: String,
}

pub async fn generate_video(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerateVideoRequest>,
) -> Result<Json<VideoOutcome>, ApiError> {
    info!(prompt_len = request.prompt.len(), "Received video request");
    // Dropping this future (client gone) stops the poll loop too.
    let cancel = state.shutdown.child_token();
    let outcome = state.video.generate(&request.prompt, cancel).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Stream a generated clip to the browser, which cannot hold the API key.
pub async fn proxy_video(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing url"))?;

    let media = state.gate.open(&url).await.map_err(ApiError::from_fetch)?;

    let mut response = Response::builder().header(
        header::CONTENT_TYPE,
        media.content_type.as_deref().unwrap_or("video/mp4"),
    );
    if let Some(len) = media.content_length {
        response = response.header(header::CONTENT_LENGTH, len);
    }
    response
        .body(Body::from_stream(media.body))
        .map_err(|e| ApiError::internal(e.to_string()))
}
