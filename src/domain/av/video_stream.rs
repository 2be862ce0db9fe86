use super::stream::FromStream;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoStream {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<String>,
}

impl FromStream for VideoStream {
    fn from_stream(stream_data: &Value) -> Option<Box<Self>> {
        match stream_data.get("codec_type").and_then(|v| v.as_str()) {
            Some("video") => Some(Box::new(VideoStream {
                codec: stream_data
                    .get("codec_name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                width: stream_data.get("width").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
                height: stream_data.get("height").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
                frame_rate: stream_data
                    .get("avg_frame_rate")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VideoStream;
    use crate::domain::av::stream::FromStream;
    use serde_json::json;

    #[test]
    fn test_from_stream_valid_video() {
        let stream_data = json!({
            "codec_type": "video",
            "codec_name": "h264",
            "avg_frame_rate": "30000/1001",
            "width": 1920,
            "height": 1080
        });
        let stream = VideoStream::from_stream(&stream_data).unwrap();
        assert_eq!(stream.codec, "h264");
        assert_eq!(stream.width, 1920);
        assert_eq!(stream.height, 1080);
        assert_eq!(stream.frame_rate.as_deref(), Some("30000/1001"));
    }

    #[test]
    fn test_from_stream_sparse_video() {
        let stream_data = json!({ "codec_type": "video" });
        let stream = VideoStream::from_stream(&stream_data).unwrap();
        assert_eq!(stream.codec, "unknown");
        assert_eq!((stream.width, stream.height), (0, 0));
        assert_eq!(stream.frame_rate, None);
    }

    #[test]
    fn test_from_stream_non_video_codec_type() {
        let stream_data = json!({
            "codec_type": "audio",
            "codec_name": "aac"
        });
        assert!(VideoStream::from_stream(&stream_data).is_none());
    }
}
