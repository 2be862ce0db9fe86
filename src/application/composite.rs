use super::proxy::ProxyGate;
use crate::domain::av::compositor::{CompositeReport, Compositor};
use crate::domain::av::workspace::{AudioFormat, JobWorkspace};
use crate::error::{Result, StudioError};
use crate::ports::media::MediaEngine;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;
use tracing::info;

/// A finished composite, still inside its workspace. Dropping the artifact
/// removes the file.
#[derive(Debug)]
pub struct CompositeArtifact {
    pub file: File,
    pub len: u64,
    pub report: CompositeReport,
    pub workspace: JobWorkspace,
}

pub struct CompositeService {
    compositor: Compositor<Arc<dyn MediaEngine>>,
    gate: ProxyGate,
    work_dir: PathBuf,
}

// Save a `Stream` to a file
async fn stream_to_file<S, E>(path: &Path, stream: S) -> io::Result<u64>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);

    let mut file = BufWriter::new(File::create(path).await?);
    let written = tokio::io::copy(&mut body_reader, &mut file).await?;
    file.flush().await?;
    Ok(written)
}

impl CompositeService {
    pub fn new(engine: Arc<dyn MediaEngine>, gate: ProxyGate, work_dir: PathBuf) -> Self {
        Self {
            compositor: Compositor::new(engine),
            gate,
            work_dir,
        }
    }

    /// Fetch the clip, write the voice, run the encoder. On any error the
    /// workspace goes out of scope here and takes every written file with it.
    pub async fn composite(&self, video_url: &str, audio_data: &str) -> Result<CompositeArtifact> {
        if video_url.trim().is_empty() || audio_data.trim().is_empty() {
            return Err(StudioError::Validation(
                "Missing videoUrl or audioData".to_string(),
            ));
        }
        let voice = STANDARD.decode(audio_data.trim())?;
        if voice.is_empty() {
            return Err(StudioError::Validation("audioData is empty".to_string()));
        }

        let workspace = JobWorkspace::create(&self.work_dir)?;
        info!(token = workspace.token(), "Composite job started");

        let format = AudioFormat::sniff(&voice);
        let voice_path = workspace.voice_path(format);
        tokio::fs::write(&voice_path, &voice).await?;

        let media = self.gate.open_reference(video_url).await?;
        let video_path = workspace.video_path();
        let written = stream_to_file(&video_path, media.body).await?;
        info!(token = workspace.token(), bytes = written, "Video downloaded");

        let report = self
            .compositor
            .composite(&video_path, &voice_path, &workspace.output_path())
            .await?;

        let file = File::open(&report.output).await?;
        let len = file.metadata().await?.len();

        Ok(CompositeArtifact {
            file,
            len,
            report,
            workspace,
        })
    }
}
