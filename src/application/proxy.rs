use super::video::unwrap_proxy_url;
use crate::error::{Result, StudioError};
use crate::ports::source::{MediaSource, RemoteMedia};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Decides which remote media the backend is willing to fetch.
///
/// Generated clips live on the generative API host and need the API key, so
/// they can only be fetched in live mode. The sample clip host is public and
/// always allowed. Nothing else is fetched.
#[derive(Clone)]
pub struct ProxyGate {
    source: Arc<dyn MediaSource>,
    trusted_host: Option<String>,
    fallback_host: Option<String>,
    live: bool,
}

impl ProxyGate {
    pub fn new(
        source: Arc<dyn MediaSource>,
        trusted_host: Option<String>,
        fallback_host: Option<String>,
        live: bool,
    ) -> Self {
        Self {
            source,
            trusted_host,
            fallback_host,
            live,
        }
    }

    fn host_of(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        match url.scheme() {
            "http" | "https" => url.host_str().map(String::from),
            _ => None,
        }
    }

    fn is_trusted(&self, host: &str) -> bool {
        self.trusted_host.as_deref() == Some(host)
    }

    fn is_fallback(&self, host: &str) -> bool {
        self.fallback_host.as_deref() == Some(host)
    }

    /// Proxy a generated clip. Only the generative API host is accepted.
    pub async fn open(&self, url: &str) -> Result<RemoteMedia> {
        match Self::host_of(url) {
            Some(host) if self.is_trusted(&host) => {}
            host => {
                warn!(?host, "Rejected proxy request");
                return Err(StudioError::Validation("Invalid video source".to_string()));
            }
        }
        if !self.live {
            return Err(StudioError::ConfigurationMissing);
        }
        info!("Proxying generated video");
        self.source.open(url).await
    }

    /// Open whatever the console handed back as a video URL: a local proxy
    /// reference, a generated clip URL or the sample clip.
    pub async fn open_reference(&self, reference: &str) -> Result<RemoteMedia> {
        if let Some(remote) = unwrap_proxy_url(reference) {
            return self.open(&remote).await;
        }
        match Self::host_of(reference) {
            Some(host) if self.is_trusted(&host) => self.open(reference).await,
            Some(host) if self.is_fallback(&host) => self.source.open(reference).await,
            _ => Err(StudioError::Validation("Invalid video source".to_string())),
        }
    }
}
