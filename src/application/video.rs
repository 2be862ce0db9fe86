use super::Upstream;
use crate::config::PollConfig;
use crate::domain::generation::{PollMachine, PollObservation, PollState, VideoOutcome};
use crate::error::{Result, StudioError};
use crate::ports::video::VideoJobs;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use url::form_urlencoded;

pub const PROXY_ROUTE: &str = "/api/proxy-video";

/// Local URL that streams `video_uri` through the proxy endpoint.
pub fn proxy_url(video_uri: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", video_uri)
        .finish();
    format!("{}?{}", PROXY_ROUTE, query)
}

/// Inverse of [`proxy_url`]: the remote URI behind a local proxy reference.
pub fn unwrap_proxy_url(reference: &str) -> Option<String> {
    let query = reference.strip_prefix(PROXY_ROUTE)?.strip_prefix('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

pub struct VideoService {
    upstream: Upstream<dyn VideoJobs>,
    poll: PollConfig,
    fallback_url: String,
}

impl VideoService {
    pub fn new(upstream: Upstream<dyn VideoJobs>, poll: PollConfig, fallback_url: String) -> Self {
        Self {
            upstream,
            poll,
            fallback_url,
        }
    }

    /// Resolve a prompt to a playable URL. Only a blank prompt is an error;
    /// every other failure degrades to the sample clip, tagged with the cause.
    pub async fn generate(&self, prompt: &str, cancel: CancellationToken) -> Result<VideoOutcome> {
        if prompt.trim().is_empty() {
            return Err(StudioError::Validation("Missing prompt".to_string()));
        }

        let jobs = match &self.upstream {
            Upstream::Live(jobs) => jobs,
            Upstream::Offline => {
                warn!("No API key configured, returning mock video");
                return Ok(VideoOutcome::mock(&self.fallback_url));
            }
        };

        match self.run_job(jobs.as_ref(), prompt, &cancel).await {
            Ok(video_uri) => {
                info!(video_uri = video_uri.as_str(), "Video generated");
                Ok(VideoOutcome::real(proxy_url(&video_uri)))
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Video generation failed, using fallback");
                Ok(VideoOutcome::fallback(&self.fallback_url, &e))
            }
        }
    }

    async fn run_job(
        &self,
        jobs: &dyn VideoJobs,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let operation = tokio::select! {
            _ = cancel.cancelled() => return Err(StudioError::Cancelled),
            submitted = jobs.submit(prompt) => submitted?,
        };
        info!(operation = operation.as_str(), "Operation started");

        let mut machine = PollMachine::new(self.poll.max_attempts);
        let max_attempts = machine.max_attempts();
        while machine.wants_poll() {
            let observation = tokio::select! {
                _ = cancel.cancelled() => {
                    machine.cancel();
                    break;
                }
                observation = async {
                    tokio::time::sleep(self.poll.interval).await;
                    jobs.poll(&operation).await
                } => observation,
            };

            if let PollObservation::Unreachable(reason) = &observation {
                warn!(reason = reason.as_str(), "Polling failed");
            }
            if let PollState::Pending { attempts } = *machine.observe(observation) {
                info!("...polling ({}/{})", attempts, max_attempts);
            }
        }

        let state = machine.into_state();
        let attempts = state.attempts();
        state
            .into_result()
            .unwrap_or(Err(StudioError::Timeout { attempts }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::GenerationMode;
    use crate::ports::video::MockVideoJobs;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const SAMPLE: &str = "https://storage.example/sample.mp4";

    fn service(jobs: MockVideoJobs, max_attempts: u32) -> VideoService {
        VideoService::new(
            Upstream::Live(Arc::new(jobs)),
            PollConfig {
                interval: Duration::from_secs(10),
                max_attempts,
            },
            SAMPLE.to_string(),
        )
    }

    #[test]
    fn test_proxy_url_encodes_uri() {
        assert_eq!(
            proxy_url("https://generativelanguage.googleapis.com/v1beta/files/a:download?alt=media"),
            "/api/proxy-video?url=https%3A%2F%2Fgenerativelanguage.googleapis.com%2Fv1beta%2Ffiles%2Fa%3Adownload%3Falt%3Dmedia"
        );
    }

    #[test]
    fn test_unwrap_proxy_url() {
        let uri = "https://generativelanguage.googleapis.com/v1beta/files/a:download?alt=media";
        assert_eq!(unwrap_proxy_url(&proxy_url(uri)).as_deref(), Some(uri));
        assert_eq!(unwrap_proxy_url("/api/proxy-video?url="), None);
        assert_eq!(unwrap_proxy_url("/api/other?url=x"), None);
        assert_eq!(unwrap_proxy_url("https://cdn.example/clip.mp4"), None);
    }

    #[tokio::test]
    async fn test_offline_returns_mock_without_calls() {
        let service = VideoService::new(Upstream::Offline, PollConfig::default(), SAMPLE.into());
        let outcome = service
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.mode, GenerationMode::Mock);
        assert_eq!(outcome.video_url, SAMPLE);
        assert!(outcome.message.is_some());
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected() {
        let service = VideoService::new(Upstream::Offline, PollConfig::default(), SAMPLE.into());
        let err = service.generate("  ", CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_a_few_polls() {
        let polls = Arc::new(AtomicU32::new(0));
        let counter = polls.clone();

        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit()
            .times(1)
            .returning(|_| Ok("operations/1".to_string()));
        jobs.expect_poll().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                PollObservation::Running
            } else {
                PollObservation::Done {
                    video_uri: "https://generativelanguage.googleapis.com/files/v".into(),
                }
            }
        });

        let outcome = service(jobs, 60)
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::Real);
        assert!(outcome.video_url.starts_with("/api/proxy-video?url=https%3A%2F%2F"));
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_done_times_out_into_fallback() {
        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit().returning(|_| Ok("operations/1".to_string()));
        jobs.expect_poll()
            .times(4)
            .returning(|_| PollObservation::Running);

        let outcome = service(jobs, 4)
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::MockFallback);
        assert_eq!(outcome.video_url, SAMPLE);
        assert_eq!(outcome.error_kind, Some("TIMEOUT"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_polls_use_up_attempts() {
        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit().returning(|_| Ok("operations/1".to_string()));
        jobs.expect_poll()
            .times(2)
            .returning(|_| PollObservation::Unreachable("503".into()));

        let outcome = service(jobs, 2)
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.error_kind, Some("TIMEOUT"));
    }

    #[tokio::test]
    async fn test_rejected_submit_surfaces_error() {
        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit().returning(|_| {
            Err(StudioError::UpstreamRejected {
                status: 400,
                body: "model not found".into(),
            })
        });
        jobs.expect_poll().never();

        let outcome = service(jobs, 60)
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.mode, GenerationMode::MockFallback);
        assert_eq!(
            outcome.error.as_deref(),
            Some("API Error: 400 - model not found")
        );
        assert_eq!(outcome.error_kind, Some("UPSTREAM_REJECTED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_job_surfaces_reason() {
        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit().returning(|_| Ok("operations/1".to_string()));
        jobs.expect_poll()
            .times(1)
            .returning(|_| PollObservation::DoneWithError("{\"code\":3}".into()));

        let outcome = service(jobs, 60)
            .generate("santa", CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.error_kind, Some("GENERATION_FAILED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_abandons_the_poll() {
        let mut jobs = MockVideoJobs::new();
        jobs.expect_submit().returning(|_| Ok("operations/1".to_string()));
        jobs.expect_poll().returning(|_| PollObservation::Running);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(35)).await;
            trigger.cancel();
        });

        let outcome = service(jobs, 60).generate("santa", cancel).await.unwrap();
        assert_eq!(outcome.error_kind, Some("CANCELLED"));
        assert_eq!(outcome.mode, GenerationMode::MockFallback);
    }
}
