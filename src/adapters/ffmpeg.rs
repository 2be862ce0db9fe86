use crate::ports::media::MediaEngine;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command as TokioCommand;

/// ffmpeg / ffprobe invoked as subprocesses.
#[derive(Clone, Debug)]
pub struct FfmpegCli {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegCli {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

impl Default for FfmpegCli {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

async fn run(program: &Path, args: Vec<OsString>) -> io::Result<Output> {
    TokioCommand::new(program)
        .args(args)
        // ffmpeg reads stdin for interactive commands
        .stdin(Stdio::null())
        // a dropped request must not leave the child running
        .kill_on_drop(true)
        .output()
        .await
}

#[async_trait]
impl MediaEngine for FfmpegCli {
    async fn encode(&self, args: Vec<OsString>) -> io::Result<Output> {
        run(&self.ffmpeg, args).await
    }

    async fn probe(&self, args: Vec<OsString>) -> io::Result<Output> {
        run(&self.ffprobe, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let cli = FfmpegCli::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let err = cli.encode(vec![OsString::from("-version")]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
