use super::rpc::{AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelection};
use super::GoogleClient;
use crate::error::Result;
use crate::ports::speech::SpeechSynthesizer;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

#[async_trait]
impl SpeechSynthesizer for GoogleClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let preview: String = text.chars().take(30).collect();
        info!(voice = self.voice.name.as_str(), "Generating voice for: \"{}...\"", preview);

        let url = format!("{}/text:synthesize", self.tts_base_url);
        let response: SynthesizeResponse = self
            .post_json(
                &url,
                &SynthesizeRequest {
                    input: SynthesisInput { text },
                    voice: VoiceSelection {
                        language_code: &self.voice.language_code,
                        name: &self.voice.name,
                    },
                    audio_config: AudioConfig {
                        audio_encoding: "MP3",
                        speaking_rate: self.voice.speaking_rate,
                        pitch: self.voice.pitch,
                    },
                },
                None,
            )
            .await?;

        Ok(STANDARD.decode(response.audio_content)?)
    }
}
