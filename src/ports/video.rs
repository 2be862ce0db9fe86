use crate::domain::generation::PollObservation;
use crate::error::Result;
use async_trait::async_trait;

/// A remote long running video generation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoJobs: Send + Sync {
    /// Start a job and return the operation name to poll.
    async fn submit(&self, prompt: &str) -> Result<String>;

    /// Check an operation once. Transport failures are reported as
    /// [`PollObservation::Unreachable`] rather than as errors.
    async fn poll(&self, operation: &str) -> PollObservation;
}
