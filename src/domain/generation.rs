//! Generation results and the polling state machine for long running video jobs.

use crate::error::StudioError;
use serde::Serialize;

/// How a generation response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    /// Produced by the remote service.
    Real,
    /// No remote service configured.
    Mock,
    /// The remote service was called and failed.
    MockFallback,
}

/// What one poll of a remote operation reported.
#[derive(Debug, Clone, PartialEq)]
pub enum PollObservation {
    Running,
    Done { video_uri: String },
    DoneWithError(String),
    /// The poll request itself failed. It still uses up an attempt.
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Pending { attempts: u32 },
    Succeeded { video_uri: String, attempts: u32 },
    Failed { reason: String, attempts: u32 },
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl PollState {
    pub fn attempts(&self) -> u32 {
        match self {
            PollState::Pending { attempts }
            | PollState::Succeeded { attempts, .. }
            | PollState::Failed { attempts, .. }
            | PollState::TimedOut { attempts }
            | PollState::Cancelled { attempts } => *attempts,
        }
    }

    /// Terminal state as a result. `Pending` has no result yet and yields `None`.
    pub fn into_result(self) -> Option<Result<String, StudioError>> {
        match self {
            PollState::Pending { .. } => None,
            PollState::Succeeded { video_uri, .. } => Some(Ok(video_uri)),
            PollState::Failed { reason, .. } => Some(Err(StudioError::GenerationFailed(reason))),
            PollState::TimedOut { attempts } => Some(Err(StudioError::Timeout { attempts })),
            PollState::Cancelled { .. } => Some(Err(StudioError::Cancelled)),
        }
    }
}

/// `Pending -> Succeeded | Failed | TimedOut | Cancelled`. Terminal states absorb
/// any further input.
#[derive(Debug, Clone)]
pub struct PollMachine {
    max_attempts: u32,
    state: PollState,
}

impl PollMachine {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            state: PollState::Pending { attempts: 0 },
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn into_state(self) -> PollState {
        self.state
    }

    /// Whether another poll should be issued.
    pub fn wants_poll(&self) -> bool {
        match self.state {
            PollState::Pending { attempts } => attempts < self.max_attempts,
            _ => false,
        }
    }

    pub fn observe(&mut self, observation: PollObservation) -> &PollState {
        let PollState::Pending { attempts } = self.state else {
            return &self.state;
        };
        let attempts = attempts + 1;

        self.state = match observation {
            PollObservation::Done { video_uri } => PollState::Succeeded {
                video_uri,
                attempts,
            },
            PollObservation::DoneWithError(reason) => PollState::Failed { reason, attempts },
            PollObservation::Running | PollObservation::Unreachable(_) => {
                if attempts >= self.max_attempts {
                    PollState::TimedOut { attempts }
                } else {
                    PollState::Pending { attempts }
                }
            }
        };
        &self.state
    }

    pub fn cancel(&mut self) -> &PollState {
        if let PollState::Pending { attempts } = self.state {
            self.state = PollState::Cancelled { attempts };
        }
        &self.state
    }
}

/// Response of the video generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOutcome {
    pub video_url: String,
    pub mode: GenerationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl VideoOutcome {
    pub fn real(video_url: String) -> Self {
        Self {
            video_url,
            mode: GenerationMode::Real,
            message: None,
            error: None,
            error_kind: None,
        }
    }

    pub fn mock(fallback_url: &str) -> Self {
        Self {
            video_url: fallback_url.to_string(),
            mode: GenerationMode::Mock,
            message: Some("No API Key configuration found.".to_string()),
            error: None,
            error_kind: None,
        }
    }

    pub fn fallback(fallback_url: &str, error: &StudioError) -> Self {
        Self {
            video_url: fallback_url.to_string(),
            mode: GenerationMode::MockFallback,
            message: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
        }
    }
}
