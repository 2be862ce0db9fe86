use crate::adapters::ffmpeg::FfmpegCli;
use crate::adapters::google::GoogleClient;
use crate::adapters::source::HttpMediaSource;
use crate::application::composite::CompositeService;
use crate::application::proxy::ProxyGate;
use crate::application::script::ScriptService;
use crate::application::speech::SpeechService;
use crate::application::video::VideoService;
use crate::application::Upstream;
use crate::config::AppConfig;
use crate::error::Result;
use crate::ports::script::ScriptWriter;
use crate::ports::speech::SpeechSynthesizer;
use crate::ports::video::VideoJobs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub script: Arc<ScriptService>,
    pub video: Arc<VideoService>,
    pub speech: Arc<SpeechService>,
    pub composite: Arc<CompositeService>,
    pub gate: ProxyGate,
    /// Cancelled on server shutdown. Long running requests watch a child token.
    pub shutdown: CancellationToken,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Wire every service for the configured mode. Offline services never get
    /// a client, so they cannot reach the network.
    pub fn from_config(config: &AppConfig, shutdown: CancellationToken) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let google = config
            .mode
            .api_key()
            .map(|key| Arc::new(GoogleClient::new(http.clone(), key, config)));

        let script: Upstream<dyn ScriptWriter> = match &google {
            Some(client) => Upstream::Live(client.clone()),
            None => Upstream::Offline,
        };
        let video: Upstream<dyn VideoJobs> = match &google {
            Some(client) => Upstream::Live(client.clone()),
            None => Upstream::Offline,
        };
        let speech: Upstream<dyn SpeechSynthesizer> = match &google {
            Some(client) => Upstream::Live(client.clone()),
            None => Upstream::Offline,
        };

        let trusted_host = config.trusted_media_host();
        let source = HttpMediaSource::new(
            http,
            config.mode.api_key().map(String::from),
            trusted_host.clone(),
        );
        let gate = ProxyGate::new(
            Arc::new(source),
            trusted_host,
            config.fallback_media_host(),
            config.mode.is_live(),
        );

        let engine = FfmpegCli::new(config.ffmpeg_bin.clone(), config.ffprobe_bin.clone());

        Ok(Self {
            script: Arc::new(ScriptService::new(script)),
            video: Arc::new(VideoService::new(
                video,
                config.poll,
                config.fallback_video_url.clone(),
            )),
            speech: Arc::new(SpeechService::new(speech)),
            composite: Arc::new(CompositeService::new(
                Arc::new(engine),
                gate.clone(),
                config.work_dir.clone(),
            )),
            gate,
            shutdown,
            static_dir: config.static_dir.clone(),
        })
    }
}
