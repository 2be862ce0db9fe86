use super::Upstream;
use crate::adapters::mock_audio::{silent_wav, spoken_seconds};
use crate::domain::generation::GenerationMode;
use crate::error::{Result, StudioError};
use crate::ports::speech::SpeechSynthesizer;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOutcome {
    /// Encoded audio, MP3 from the remote voice or WAV for the stand-in.
    pub audio: Vec<u8>,
    pub mode: GenerationMode,
    pub error: Option<String>,
    pub error_kind: Option<&'static str>,
}

pub struct SpeechService {
    upstream: Upstream<dyn SpeechSynthesizer>,
}

impl SpeechService {
    pub fn new(upstream: Upstream<dyn SpeechSynthesizer>) -> Self {
        Self { upstream }
    }

    fn silence_for(text: &str) -> Result<Vec<u8>> {
        silent_wav(spoken_seconds(text))
            .map_err(|e| StudioError::Encoding(format!("failed to write stand-in audio: {}", e)))
    }

    pub async fn synthesize(&self, text: &str) -> Result<SpeechOutcome> {
        if text.trim().is_empty() {
            return Err(StudioError::Validation("Missing text".to_string()));
        }

        let synthesizer = match &self.upstream {
            Upstream::Live(synthesizer) => synthesizer,
            Upstream::Offline => {
                warn!("No API key configured, returning silent audio");
                return Ok(SpeechOutcome {
                    audio: Self::silence_for(text)?,
                    mode: GenerationMode::Mock,
                    error: None,
                    error_kind: None,
                });
            }
        };

        match synthesizer.synthesize(text).await {
            Ok(audio) => {
                info!(bytes = audio.len(), "Speech synthesized");
                Ok(SpeechOutcome {
                    audio,
                    mode: GenerationMode::Real,
                    error: None,
                    error_kind: None,
                })
            }
            Err(e) => {
                if e.is_api_not_enabled() {
                    error!("Text-to-Speech API is not enabled for this project");
                }
                error!(error = %e, kind = e.kind(), "Speech synthesis failed, using silent audio");
                Ok(SpeechOutcome {
                    audio: Self::silence_for(text)?,
                    mode: GenerationMode::MockFallback,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind()),
                })
            }
        }
    }
}
