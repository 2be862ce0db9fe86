//! Configuration loaded from the environment.
//!
//! The credential lookup happens once, here. Everything downstream receives an
//! explicit [`ApiMode`] instead of checking for a key on its own.

use crate::error::StudioError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";
pub const DEFAULT_FALLBACK_VIDEO_URL: &str =
    "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

/// Whether remote generative services are called at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiMode {
    /// Remote services are called with this API key.
    Live { api_key: String },
    /// No remote service is contacted; every generator answers with its fallback.
    Offline,
}

impl ApiMode {
    pub fn api_key(&self) -> Option<&str> {
        match self {
            ApiMode::Live { api_key } => Some(api_key),
            ApiMode::Offline => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, ApiMode::Live { .. })
    }
}

/// Fixed-interval, fixed-attempt polling of long running video jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 60,
        }
    }
}

/// Voice used for the speech synthesis request.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceConfig {
    pub language_code: String,
    pub name: String,
    pub speaking_rate: f32,
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: String::from("en-US"),
            name: String::from("en-US-Studio-M"),
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    pub mode: ApiMode,
    /// Base URL of the generative language API (script + video jobs)
    pub gemini_base_url: String,
    /// Base URL of the text-to-speech API
    pub tts_base_url: String,
    pub script_model: String,
    pub video_model: String,
    pub voice: VoiceConfig,
    pub poll: PollConfig,
    /// Per-request timeout of the script generation call
    pub script_timeout: Duration,
    /// Sample clip returned whenever video generation cannot produce a real one
    pub fallback_video_url: String,
    /// Directory holding the built console (index.html + assets)
    pub static_dir: PathBuf,
    /// Parent directory of the per-request compositing workspaces
    pub work_dir: PathBuf,
    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
}

// A set but unparsable value is an error, never a silent default.
fn parse_count<T>(key: &str, raw: &str, min: T) -> Result<T, StudioError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value >= min => Ok(value),
        _ => Err(StudioError::Validation(format!(
            "{} must be an integer >= {}, got `{}`",
            key, min, raw
        ))),
    }
}

impl AppConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, StudioError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StudioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").or_else(|| get("VITE_GEMINI_API_KEY"));
        let mode = match (get("SANTA_API_MODE").as_deref(), api_key) {
            (Some("offline"), _) => ApiMode::Offline,
            (Some("live"), None) => return Err(StudioError::ConfigurationMissing),
            (Some("live"), Some(api_key)) | (None, Some(api_key)) => ApiMode::Live { api_key },
            (None, None) => ApiMode::Offline,
            (Some(other), _) => {
                return Err(StudioError::Validation(format!(
                    "SANTA_API_MODE must be `live` or `offline`, got `{}`",
                    other
                )))
            }
        };

        let poll_defaults = PollConfig::default();
        let poll = PollConfig {
            interval: match get("POLL_INTERVAL_SECS") {
                Some(raw) => Duration::from_secs(parse_count("POLL_INTERVAL_SECS", &raw, 0)?),
                None => poll_defaults.interval,
            },
            max_attempts: match get("POLL_MAX_ATTEMPTS") {
                Some(raw) => parse_count("POLL_MAX_ATTEMPTS", &raw, 1)?,
                None => poll_defaults.max_attempts,
            },
        };

        let voice = VoiceConfig {
            name: get("TTS_VOICE").unwrap_or_else(|| VoiceConfig::default().name),
            ..VoiceConfig::default()
        };

        Ok(Self {
            addr: get("ADDR").unwrap_or_else(|| String::from("127.0.0.1")),
            port: get("PORT").unwrap_or_else(|| String::from("3001")),
            mode,
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| String::from(DEFAULT_GEMINI_BASE_URL)),
            tts_base_url: get("TTS_BASE_URL").unwrap_or_else(|| String::from(DEFAULT_TTS_BASE_URL)),
            script_model: get("SCRIPT_MODEL").unwrap_or_else(|| String::from("gemini-2.0-flash")),
            video_model: get("VIDEO_MODEL").unwrap_or_else(|| String::from("veo-2.0-generate-001")),
            voice,
            poll,
            script_timeout: Duration::from_secs(10),
            fallback_video_url: get("FALLBACK_VIDEO_URL")
                .unwrap_or_else(|| String::from(DEFAULT_FALLBACK_VIDEO_URL)),
            static_dir: PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| String::from("dist"))),
            work_dir: get("WORK_DIR").map(PathBuf::from).unwrap_or_else(env::temp_dir),
            ffmpeg_bin: PathBuf::from(get("FFMPEG_BIN").unwrap_or_else(|| String::from("ffmpeg"))),
            ffprobe_bin: PathBuf::from(
                get("FFPROBE_BIN").unwrap_or_else(|| String::from("ffprobe")),
            ),
        })
    }

    /// Host the video proxy is allowed to fetch from.
    pub fn trusted_media_host(&self) -> Option<String> {
        reqwest::Url::parse(&self.gemini_base_url)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
    }

    /// Host of the public sample clip.
    pub fn fallback_media_host(&self) -> Option<String> {
        reqwest::Url::parse(&self.fallback_video_url)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
    }
}
