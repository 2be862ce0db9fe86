use super::stream::FromStream;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioStream {
    pub codec: String,
    pub channels: Option<u64>,
    pub sample_rate: Option<u32>,
}

impl FromStream for AudioStream {
    fn from_stream(stream_data: &Value) -> Option<Box<AudioStream>> {
        match stream_data.get("codec_type").and_then(|v| v.as_str()) {
            Some("audio") => Some(Box::new(AudioStream {
                // codec_type alone decides that the track is audio
                codec: stream_data
                    .get("codec_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                channels: stream_data.get("channels").and_then(|v| v.as_u64()),
                sample_rate: stream_data
                    .get("sample_rate")
                    .and_then(|v| v.as_str())
                    .and_then(|v| v.parse().ok()),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AudioStream;
    use super::FromStream;
    use serde_json::json;

    #[test]
    fn test_from_stream_valid_audio() {
        let stream_data = json!({
            "codec_type": "audio",
            "codec_name": "aac",
            "channels": 2,
            "sample_rate": "44100"
        });
        let stream = AudioStream::from_stream(&stream_data).unwrap();
        assert_eq!(stream.codec, "aac");
        assert_eq!(stream.channels, Some(2));
        assert_eq!(stream.sample_rate, Some(44100));
    }

    #[test]
    fn test_from_stream_non_audio_codec_type() {
        let stream_data = json!({
            "codec_type": "video",
            "codec_name": "h264"
        });
        assert!(AudioStream::from_stream(&stream_data).is_none());
    }

    #[test]
    fn test_from_stream_missing_codec_name() {
        let stream_data = json!({ "codec_type": "audio", "channels": 1 });
        let stream = AudioStream::from_stream(&stream_data).unwrap();
        assert_eq!(stream.codec, "unknown");
        assert_eq!(stream.channels, Some(1));
        assert_eq!(stream.sample_rate, None);
    }
}
