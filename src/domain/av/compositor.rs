//! Looping a clip under a voice track.
//!
//! The clip is looped forever, its own audio is ducked and mixed with the
//! voice, and the result stops with the voice. The length policy is applied
//! twice: `duration=shortest` on the mix and `-shortest` on the mux.

use super::stream::{probe_args, MediaInfo};
use crate::error::{Result, StudioError};
use crate::ports::media::MediaEngine;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const MIXED_AUDIO_LABEL: &str = "[a_out]";
const STDERR_TAIL_LINES: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct MixSettings {
    /// Gain applied to the clip's own audio before mixing.
    pub ambient_volume: f32,
    /// Seconds of fade when a mix input ends.
    pub dropout_transition: f32,
}

impl Default for MixSettings {
    fn default() -> Self {
        Self {
            ambient_volume: 0.2,
            dropout_transition: 2.0,
        }
    }
}

impl MixSettings {
    /// Filter graph producing `[a_out]`. Without an ambient track the voice is
    /// passed through alone.
    pub fn filter_graph(&self, with_ambient: bool) -> String {
        if with_ambient {
            format!(
                "[0:a]volume={}[bg];[bg][1:a]amix=inputs=2:duration=shortest:dropout_transition={}{}",
                self.ambient_volume, self.dropout_transition, MIXED_AUDIO_LABEL
            )
        } else {
            format!("[1:a]anull{}", MIXED_AUDIO_LABEL)
        }
    }
}

/// Output encoding, biased towards speed and a bounded size.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub video_bitrate: String,
    pub preset: String,
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: String::from("libx264"),
            // keeps a one minute clip under ~20MB
            video_bitrate: String::from("2500k"),
            preset: String::from("veryfast"),
            audio_codec: String::from("aac"),
        }
    }
}

/// Full encoder argument list for one compositing run.
pub fn encode_args(
    video: &Path,
    audio: &Path,
    output: &Path,
    mix: &MixSettings,
    encode: &EncodeSettings,
    with_ambient: bool,
) -> Vec<OsString> {
    let graph = mix.filter_graph(with_ambient);
    let mut args: Vec<OsString> = Vec::with_capacity(24);

    // Input 0: the clip, looped forever
    args.extend(["-y", "-stream_loop", "-1", "-i"].map(OsString::from));
    args.push(video.as_os_str().to_os_string());
    // Input 1: the voice
    args.push(OsString::from("-i"));
    args.push(audio.as_os_str().to_os_string());

    args.extend(
        [
            "-filter_complex",
            graph.as_str(),
            "-map",
            "0:v",
            "-map",
            MIXED_AUDIO_LABEL,
            "-shortest",
            "-c:v",
            encode.video_codec.as_str(),
            "-b:v",
            encode.video_bitrate.as_str(),
            "-preset",
            encode.preset.as_str(),
            "-c:a",
            encode.audio_codec.as_str(),
        ]
        .map(OsString::from),
    );

    args.push(output.as_os_str().to_os_string());
    args
}

/// Last lines of the encoder's stderr, where ffmpeg prints the actual failure.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeReport {
    pub output: PathBuf,
    /// Voice duration from the pre-flight probe, when it succeeded.
    pub expected_duration: Option<f64>,
    /// Duration of the written file, when the post-hoc probe succeeded.
    pub output_duration: Option<f64>,
    pub ambient_mixed: bool,
}

pub struct Compositor<E> {
    engine: E,
    mix: MixSettings,
    encode: EncodeSettings,
}

impl<E: MediaEngine> Compositor<E> {
    pub fn new(engine: E) -> Self {
        Self::with_settings(engine, MixSettings::default(), EncodeSettings::default())
    }

    pub fn with_settings(engine: E, mix: MixSettings, encode: EncodeSettings) -> Self {
        Self {
            engine,
            mix,
            encode,
        }
    }

    pub async fn probe(&self, path: &Path) -> std::result::Result<MediaInfo, String> {
        let output = self
            .engine
            .probe(probe_args(path))
            .await
            .map_err(|e| e.to_string())?;
        if !output.status.success() {
            return Err(stderr_tail(&output.stderr));
        }
        MediaInfo::from_probe_json(&output.stdout)
    }

    /// Write `output` from `video` looped under `audio`. Nothing is deleted
    /// here, on failure the caller owns the cleanup of all three paths.
    pub async fn composite(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<CompositeReport> {
        info!(?video, ?audio, ?output, "Compositing started");

        let (video_info, audio_info) = tokio::join!(self.probe(video), self.probe(audio));

        let expected_duration = match (&video_info, &audio_info) {
            (Ok(v), Ok(a)) => {
                info!(
                    video_duration = ?v.duration,
                    video_tracks = v.tracks().as_str(),
                    audio_duration = ?a.duration,
                    audio_tracks = a.tracks().as_str(),
                    "Input stats"
                );
                if !v.has_video() {
                    warn!("Clip has no video stream");
                }
                info!(expected = ?a.duration, "Expected output duration");
                a.duration
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = e.as_str(), "Failed to probe inputs (proceeding anyway)");
                audio_info.as_ref().ok().and_then(|a| a.duration)
            }
        };

        // Without a probe we cannot tell, assume the clip carries sound.
        let with_ambient = video_info.as_ref().map(MediaInfo::has_audio).unwrap_or(true);
        if !with_ambient {
            info!("Video has no audio track, using the voice alone");
        }

        let args = encode_args(video, audio, output, &self.mix, &self.encode, with_ambient);
        info!(
            command = %args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" "),
            "Spawning ffmpeg"
        );

        let result = self.engine.encode(args).await.map_err(|e| {
            error!(error = %e, "Failed to run ffmpeg");
            StudioError::Encoding(format!("failed to run ffmpeg: {}", e))
        })?;

        if !result.status.success() {
            let tail = stderr_tail(&result.stderr);
            error!(status = %result.status, stderr = tail.as_str(), "Compositing failed");
            return Err(StudioError::Encoding(format!(
                "ffmpeg exited with {}: {}",
                result.status, tail
            )));
        }

        info!("Compositing finished successfully");

        let output_duration = match self.probe(output).await {
            Ok(info) => {
                info!(duration = ?info.duration, "Final output duration");
                info.duration
            }
            Err(_) => None,
        };

        Ok(CompositeReport {
            output: output.to_path_buf(),
            expected_duration,
            output_duration,
            ambient_mixed: with_ambient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::media::MockMediaEngine;
    use serde_json::json;
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};

    fn ok(stdout: Vec<u8>) -> Output {
        Output {
            status: ExitStatus::from_raw(0),
            stdout,
            stderr: Vec::new(),
        }
    }

    fn failed(stderr: &str) -> Output {
        Output {
            // wait status for exit code 1
            status: ExitStatus::from_raw(1 << 8),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    fn probe_json(duration: f64, audio: bool, video: bool) -> Vec<u8> {
        let mut streams = Vec::new();
        if video {
            streams.push(json!({ "codec_type": "video", "codec_name": "h264", "width": 1280, "height": 720 }));
        }
        if audio {
            streams.push(json!({ "codec_type": "audio", "codec_name": "aac", "channels": 2 }));
        }
        json!({ "streams": streams, "format": { "duration": duration.to_string() } })
            .to_string()
            .into_bytes()
    }

    fn arg_position(args: &[OsString], needle: &str) -> usize {
        args.iter()
            .position(|a| a == needle)
            .unwrap_or_else(|| panic!("{} missing from {:?}", needle, args))
    }

    #[test]
    fn test_filter_graph_ducks_and_mixes() {
        assert_eq!(
            MixSettings::default().filter_graph(true),
            "[0:a]volume=0.2[bg];[bg][1:a]amix=inputs=2:duration=shortest:dropout_transition=2[a_out]"
        );
        assert_eq!(MixSettings::default().filter_graph(false), "[1:a]anull[a_out]");
    }

    #[test]
    fn test_encode_args_layout() {
        let args = encode_args(
            Path::new("in.mp4"),
            Path::new("voice.mp3"),
            Path::new("out.mp4"),
            &MixSettings::default(),
            &EncodeSettings::default(),
            true,
        );

        // the loop flag must precede the input it applies to
        let stream_loop = arg_position(&args, "-stream_loop");
        assert_eq!(args[stream_loop + 1], "-1");
        assert_eq!(args[stream_loop + 2], "-i");
        assert_eq!(args[stream_loop + 3], "in.mp4");
        assert_eq!(args[stream_loop + 5], "voice.mp3");

        let first_map = arg_position(&args, "-map");
        assert_eq!(args[first_map + 1], "0:v");
        assert_eq!(args[first_map + 3], "[a_out]");
        arg_position(&args, "-shortest");
        assert_eq!(args[arg_position(&args, "-c:v") + 1], "libx264");
        assert_eq!(args[arg_position(&args, "-b:v") + 1], "2500k");
        assert_eq!(args[arg_position(&args, "-preset") + 1], "veryfast");
        assert_eq!(args[arg_position(&args, "-c:a") + 1], "aac");
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr = (1..=10).map(|i| format!("line {}\n", i)).collect::<String>();
        let tail = stderr_tail(stderr.as_bytes());
        assert!(tail.starts_with("line 5"));
        assert!(tail.ends_with("line 10"));
    }

    #[tokio::test]
    async fn test_composite_success_reports_durations() {
        let mut engine = MockMediaEngine::new();
        engine.expect_probe().times(3).returning(|args| {
            let path = args.last().unwrap().to_string_lossy().to_string();
            let out = if path.ends_with("video.mp4") {
                probe_json(5.0, true, true)
            } else if path.ends_with("voice.mp3") {
                probe_json(12.0, true, false)
            } else {
                probe_json(12.02, true, true)
            };
            Ok(ok(out))
        });
        engine
            .expect_encode()
            .withf(|args| {
                args.iter()
                    .any(|a| a.to_string_lossy().starts_with("[0:a]volume=0.2"))
            })
            .times(1)
            .returning(|_| Ok(ok(Vec::new())));

        let compositor = Compositor::new(engine);
        let report = compositor
            .composite(
                Path::new("/w/video.mp4"),
                Path::new("/w/voice.mp3"),
                Path::new("/w/composite.mp4"),
            )
            .await
            .unwrap();

        assert_eq!(report.expected_duration, Some(12.0));
        assert_eq!(report.output_duration, Some(12.02));
        assert!(report.ambient_mixed);
    }

    #[tokio::test]
    async fn test_probe_failure_is_not_fatal() {
        let mut engine = MockMediaEngine::new();
        engine
            .expect_probe()
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "ffprobe")));
        engine.expect_encode().times(1).returning(|_| Ok(ok(Vec::new())));

        let report = Compositor::new(engine)
            .composite(Path::new("v.mp4"), Path::new("a.wav"), Path::new("o.mp4"))
            .await
            .unwrap();

        assert_eq!(report.expected_duration, None);
        assert_eq!(report.output_duration, None);
        assert!(report.ambient_mixed, "unknown inputs keep the ducking graph");
    }

    #[tokio::test]
    async fn test_silent_clip_uses_voice_only_graph() {
        let mut engine = MockMediaEngine::new();
        engine.expect_probe().returning(|args| {
            let path = args.last().unwrap().to_string_lossy().to_string();
            Ok(ok(probe_json(8.0, !path.ends_with("v.mp4"), true)))
        });
        engine
            .expect_encode()
            .withf(|args| args.iter().any(|a| a == "[1:a]anull[a_out]"))
            .times(1)
            .returning(|_| Ok(ok(Vec::new())));

        let report = Compositor::new(engine)
            .composite(Path::new("v.mp4"), Path::new("a.wav"), Path::new("o.mp4"))
            .await
            .unwrap();
        assert!(!report.ambient_mixed);
    }

    #[tokio::test]
    async fn test_encoder_failure_is_encoding_error() {
        let mut engine = MockMediaEngine::new();
        engine
            .expect_probe()
            .returning(|_| Ok(ok(probe_json(5.0, true, true))));
        engine
            .expect_encode()
            .returning(|_| Ok(failed("Stream specifier ':a' matches no streams.")));

        let err = Compositor::new(engine)
            .composite(Path::new("v.mp4"), Path::new("a.wav"), Path::new("o.mp4"))
            .await
            .unwrap_err();

        match err {
            StudioError::Encoding(message) => assert!(message.contains("matches no streams")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_is_encoding_error() {
        let mut engine = MockMediaEngine::new();
        engine
            .expect_probe()
            .returning(|_| Ok(ok(probe_json(5.0, true, true))));
        engine
            .expect_encode()
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no ffmpeg")));

        let err = Compositor::new(engine)
            .composite(Path::new("v.mp4"), Path::new("a.wav"), Path::new("o.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ENCODING_ERROR");
    }
}
