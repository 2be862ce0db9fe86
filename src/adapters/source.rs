use crate::error::{Result, StudioError};
use crate::ports::source::{MediaSource, RemoteMedia};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tracing::info;
use url::Url;

/// Streams media over HTTP. Requests to the generative API host carry the API
/// key, any other host is fetched anonymously.
#[derive(Clone, Debug)]
pub struct HttpMediaSource {
    http: reqwest::Client,
    api_key: Option<String>,
    keyed_host: Option<String>,
}

impl HttpMediaSource {
    pub fn new(http: reqwest::Client, api_key: Option<String>, keyed_host: Option<String>) -> Self {
        Self {
            http,
            api_key,
            keyed_host,
        }
    }

    fn authorize(&self, mut url: Url) -> Url {
        if let (Some(key), Some(host)) = (&self.api_key, &self.keyed_host) {
            if url.host_str() == Some(host.as_str()) {
                url.query_pairs_mut().append_pair("key", key);
            }
        }
        url
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn open(&self, url: &str) -> Result<RemoteMedia> {
        let url = Url::parse(url)
            .map_err(|e| StudioError::Validation(format!("Invalid video source: {}", e)))?;
        info!(host = url.host_str().unwrap_or_default(), path = url.path(), "Fetching media");

        let response = self.http.get(self.authorize(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::UpstreamRejected {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(RemoteMedia {
            content_type,
            content_length: response.content_length(),
            body: response.bytes_stream().map_err(StudioError::from).boxed(),
        })
    }
}
