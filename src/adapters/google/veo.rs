use super::rpc::{Operation, PredictRequest, PromptInstance};
use super::{read_json, GoogleClient};
use crate::domain::generation::PollObservation;
use crate::error::{Result, StudioError};
use crate::ports::video::VideoJobs;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

#[async_trait]
impl VideoJobs for GoogleClient {
    async fn submit(&self, prompt: &str) -> Result<String> {
        info!(model = self.video_model.as_str(), "Launching video generation");

        let url = self.model_url(&self.video_model, "predictLongRunning");
        let operation: Operation = self
            .post_json(
                &url,
                &PredictRequest {
                    instances: vec![PromptInstance { prompt }],
                },
                None,
            )
            .await?;

        operation
            .name
            .ok_or_else(|| StudioError::MalformedResponse("operation without a name".to_string()))
    }

    async fn poll(&self, operation: &str) -> PollObservation {
        let url = format!("{}/{}", self.base_url, operation.trim_start_matches('/'));
        let response = match self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PollObservation::Unreachable(e.to_string()),
        };

        let raw: Value = match read_json(response).await {
            Ok(raw) => raw,
            Err(e) => return PollObservation::Unreachable(e.to_string()),
        };
        match serde_json::from_value::<Operation>(raw.clone()) {
            Ok(op) => op.into_observation(&raw),
            Err(e) => PollObservation::Unreachable(e.to_string()),
        }
    }
}
