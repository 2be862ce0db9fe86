//! Google generative language + text-to-speech REST adapters.
//!
//! One [`GoogleClient`] implements the script, video and speech ports, each in
//! its own module.

mod gemini;
pub(crate) mod rpc;
mod tts;
mod veo;

use crate::config::{AppConfig, VoiceConfig};
use crate::error::{Result, StudioError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct GoogleClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    tts_base_url: String,
    script_model: String,
    video_model: String,
    voice: VoiceConfig,
    script_timeout: Duration,
}

impl GoogleClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            tts_base_url: config.tts_base_url.trim_end_matches('/').to_string(),
            script_model: config.script_model.clone(),
            video_model: config.video_model.clone(),
            voice: config.voice.clone(),
            script_timeout: config.script_timeout,
        }
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<B, R>(&self, url: &str, body: &B, timeout: Option<Duration>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        read_json(request.send().await?).await
    }
}

/// Decode a JSON body, turning non-success statuses into `UpstreamRejected`.
pub(crate) async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StudioError::UpstreamRejected {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| StudioError::MalformedResponse(e.to_string()))
}
