//! Per-request scratch space for one compositing job.
//!
//! Every file of a job lives in a directory named after the job token. The
//! directory is removed when the workspace is dropped, whatever the outcome.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

/// Container of a synthesized voice track, sniffed from its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    /// Left for ffmpeg to detect.
    Unknown,
}

impl AudioFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => AudioFormat::Wav,
            [b'I', b'D', b'3', ..] => AudioFormat::Mp3,
            // MPEG audio frame sync: 11 set bits
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => AudioFormat::Mp3,
            [b'O', b'g', b'g', b'S', ..] => AudioFormat::Ogg,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Unknown => "bin",
        }
    }
}

#[derive(Debug)]
pub struct JobWorkspace {
    token: String,
    root: PathBuf,
    dir: Option<TempDir>,
}

impl JobWorkspace {
    pub fn create(parent: &Path) -> io::Result<Self> {
        let token = Uuid::new_v4().simple().to_string();
        std::fs::create_dir_all(parent)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("composite-{}-", token))
            .tempdir_in(parent)?;
        debug!(token = token.as_str(), path = ?dir.path(), "Workspace created");

        Ok(Self {
            token,
            root: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn video_path(&self) -> PathBuf {
        self.root.join("video.mp4")
    }

    pub fn voice_path(&self, format: AudioFormat) -> PathBuf {
        self.root.join(format!("voice.{}", format.extension()))
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join("composite.mp4")
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!(token = self.token.as_str(), "Workspace removed"),
                Err(e) => warn!(
                    token = self.token.as_str(),
                    path = ?self.root,
                    error = %e,
                    "Failed to remove workspace"
                ),
            }
        }
    }
}
