use super::audio_stream::AudioStream;
use super::video_stream::VideoStream;
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;

pub trait FromStream {
    fn from_stream(stream_data: &Value) -> Option<Box<Self>>
    where
        Self: Sized;
}

/// What ffprobe tells us about one media file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration: Option<f64>,
    pub video_streams: Vec<VideoStream>,
    pub audio_streams: Vec<AudioStream>,
}

impl MediaInfo {
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// One entry per track, e.g. `h264 1280x720@24/1, aac 2ch 48000Hz`.
    pub fn tracks(&self) -> String {
        let video = self.video_streams.iter().map(|v| {
            format!(
                "{} {}x{}@{}",
                v.codec,
                v.width,
                v.height,
                v.frame_rate.as_deref().unwrap_or("?")
            )
        });
        let audio = self.audio_streams.iter().map(|a| {
            let mut track = a.codec.clone();
            if let Some(channels) = a.channels {
                track.push_str(&format!(" {}ch", channels));
            }
            if let Some(rate) = a.sample_rate {
                track.push_str(&format!(" {}Hz", rate));
            }
            track
        });
        video.chain(audio).collect::<Vec<_>>().join(", ")
    }

    /// Parse the output of `ffprobe -show_format -show_streams -print_format json`.
    pub fn from_probe_json(raw: &[u8]) -> Result<Self, String> {
        let v: Value = serde_json::from_slice(raw).map_err(|e| e.to_string())?;

        // ffprobe prints numbers as strings ("12.000000")
        let duration = v
            .get("format")
            .and_then(|format| format.get("duration"))
            .and_then(|duration| match duration {
                Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            });

        let streams = v
            .get("streams")
            .and_then(|streams| streams.as_array())
            .ok_or_else(|| String::from("Couldn't get streams from ffprobe"))?;

        Ok(MediaInfo {
            duration,
            video_streams: streams
                .iter()
                .filter_map(VideoStream::from_stream)
                .map(|stream| *stream)
                .collect(),
            audio_streams: streams
                .iter()
                .filter_map(AudioStream::from_stream)
                .map(|stream| *stream)
                .collect(),
        })
    }
}

pub fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_format",
        "-show_streams",
        "-print_format",
        "json",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(path.as_os_str().to_os_string());
    args
}
