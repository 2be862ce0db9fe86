use super::error::ApiError;
use super::extract::ApiJson;
use super::state::AppState;
use crate::application::composite::CompositeArtifact;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::Response,
};
use futures::StreamExt;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::info;

const DOWNLOAD_NAME: &str = "Santa_Message.mp4";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRequest {
    #[serde(default)]
    pub video_url: String,
    /// Base64 encoded voice track.
    #[serde(default)]
    pub audio_data: String,
}

pub async fn composite(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CompositeRequest>,
) -> Result<Response, ApiError> {
    let artifact = state
        .composite
        .composite(&request.video_url, &request.audio_data)
        .await?;
    download_response(artifact)
}

/// Attachment response streaming the composite file.
fn download_response(artifact: CompositeArtifact) -> Result<Response, ApiError> {
    let CompositeArtifact {
        file,
        len,
        report,
        workspace,
    } = artifact;

    info!(
        token = workspace.token(),
        bytes = len,
        duration = ?report.output_duration,
        "Streaming composite"
    );

    // The workspace rides along with the body and is removed once the body
    // is finished or dropped.
    let body = ReaderStream::new(file).map(move |chunk| {
        let _workspace = &workspace;
        chunk
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, len)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
        )
        .body(Body::from_stream(body))
        .map_err(|e| ApiError::internal(e.to_string()))
}
