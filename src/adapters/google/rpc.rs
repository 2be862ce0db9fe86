//! Wire types of the generative language and text-to-speech REST APIs.
//! Only the fields we read are declared; everything else is ignored.

use crate::domain::generation::PollObservation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- models/{model}:generateContent

#[derive(Serialize)]
pub(crate) struct GenerateContentRequest<'s> {
    pub(crate) contents: Vec<Content<'s>>,
}

#[derive(Serialize)]
pub(crate) struct Content<'s> {
    pub(crate) parts: Vec<TextPart<'s>>,
}

#[derive(Serialize)]
pub(crate) struct TextPart<'s> {
    pub(crate) text: &'s str,
}

impl<'s> GenerateContentRequest<'s> {
    pub(crate) fn from_prompt(prompt: &'s str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub(crate) struct Candidate {
    pub(crate) content: Option<CandidateContent>,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
pub(crate) struct CandidatePart {
    pub(crate) text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub(crate) fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// --- models/{model}:predictLongRunning and operations/{id}

#[derive(Serialize)]
pub(crate) struct PredictRequest<'s> {
    pub(crate) instances: Vec<PromptInstance<'s>>,
}

#[derive(Serialize)]
pub(crate) struct PromptInstance<'s> {
    pub(crate) prompt: &'s str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Operation {
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) done: bool,
    pub(crate) error: Option<Value>,
    pub(crate) response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationResponse {
    pub(crate) generate_video_response: Option<GenerateVideoResponse>,
    /// Shape used by newer preview models.
    #[serde(default)]
    pub(crate) generated_videos: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateVideoResponse {
    #[serde(default)]
    pub(crate) generated_samples: Vec<GeneratedVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratedVideo {
    pub(crate) video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoRef {
    pub(crate) uri: Option<String>,
}

fn first_uri(videos: &[GeneratedVideo]) -> Option<&str> {
    videos.first()?.video.as_ref()?.uri.as_deref()
}

impl Operation {
    pub(crate) fn video_uri(&self) -> Option<&str> {
        let response = self.response.as_ref()?;
        response
            .generate_video_response
            .as_ref()
            .and_then(|r| first_uri(&r.generated_samples))
            .or_else(|| first_uri(&response.generated_videos))
    }

    pub(crate) fn into_observation(self, raw: &Value) -> PollObservation {
        if !self.done {
            return PollObservation::Running;
        }
        if let Some(error) = &self.error {
            return PollObservation::DoneWithError(error.to_string());
        }
        match self.video_uri() {
            Some(uri) => PollObservation::Done {
                video_uri: uri.to_string(),
            },
            None => PollObservation::DoneWithError(format!(
                "Video URI not found in response: {}",
                raw
            )),
        }
    }
}

// --- text:synthesize

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SynthesizeRequest<'s> {
    pub(crate) input: SynthesisInput<'s>,
    pub(crate) voice: VoiceSelection<'s>,
    pub(crate) audio_config: AudioConfig<'s>,
}

#[derive(Serialize)]
pub(crate) struct SynthesisInput<'s> {
    pub(crate) text: &'s str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceSelection<'s> {
    pub(crate) language_code: &'s str,
    pub(crate) name: &'s str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AudioConfig<'s> {
    pub(crate) audio_encoding: &'s str,
    pub(crate) speaking_rate: f32,
    pub(crate) pitch: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SynthesizeResponse {
    /// base64 encoded audio
    pub(crate) audio_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observe(raw: Value) -> PollObservation {
        let op: Operation = serde_json::from_value(raw.clone()).unwrap();
        op.into_observation(&raw)
    }

    #[test]
    fn test_content_request_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hi")).unwrap();
        assert_eq!(body, json!({ "contents": [{ "parts": [{ "text": "hi" }] }] }));
    }

    #[test]
    fn test_first_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Ho ho ho!" }], "role": "model" } }]
        }))
        .unwrap();
        assert_eq!(response.into_first_text().as_deref(), Some("Ho ho ho!"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_first_text().is_none());
    }

    #[test]
    fn test_running_operation() {
        assert_eq!(
            observe(json!({ "name": "models/veo/operations/1" })),
            PollObservation::Running
        );
    }

    #[test]
    fn test_sample_uri() {
        let observation = observe(json!({
            "name": "op",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [{ "video": { "uri": "https://g/files/a" } }] } }
        }));
        assert_eq!(
            observation,
            PollObservation::Done {
                video_uri: "https://g/files/a".into()
            }
        );
    }

    #[test]
    fn test_generated_videos_uri() {
        let observation = observe(json!({
            "done": true,
            "response": { "generatedVideos": [{ "video": { "uri": "https://g/files/b" } }] }
        }));
        assert_eq!(
            observation,
            PollObservation::Done {
                video_uri: "https://g/files/b".into()
            }
        );
    }

    #[test]
    fn test_done_with_error_or_without_uri() {
        assert!(matches!(
            observe(json!({ "done": true, "error": { "code": 8, "message": "quota" } })),
            PollObservation::DoneWithError(reason) if reason.contains("quota")
        ));
        assert!(matches!(
            observe(json!({ "done": true, "response": {} })),
            PollObservation::DoneWithError(reason) if reason.contains("Video URI not found")
        ));
    }

    #[test]
    fn test_synthesize_request_shape() {
        let body = serde_json::to_value(SynthesizeRequest {
            input: SynthesisInput { text: "hello" },
            voice: VoiceSelection {
                language_code: "en-US",
                name: "en-US-Studio-M",
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: 1.0,
                pitch: 0.0,
            },
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "input": { "text": "hello" },
                "voice": { "languageCode": "en-US", "name": "en-US-Studio-M" },
                "audioConfig": { "audioEncoding": "MP3", "speakingRate": 1.0, "pitch": 0.0 }
            })
        );
    }
}
