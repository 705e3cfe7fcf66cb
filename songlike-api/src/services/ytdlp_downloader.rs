//! Video download via the `yt-dlp` command-line tool
//!
//! Downloads the best audio-bearing format of a video into a scratch
//! directory as `<video id>.<ext>`. The child process is killed when the
//! download future is dropped, which is how the pipeline's timeout aborts it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::models::VideoId;
use crate::services::process::{describe_status, stderr_tail};
use crate::types::{DownloadError, VideoDownloader};

/// Format selector: audio-only stream if offered, otherwise the smallest
/// muxed stream that still carries audio.
const FORMAT_SELECTOR: &str = "bestaudio/worst[acodec!=none]/best";

/// yt-dlp backed downloader
pub struct YtDlpDownloader {
    program: PathBuf,
}

impl YtDlpDownloader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, video: &VideoId, dest_dir: &Path) -> Command {
        let template = dest_dir.join(format!("{}.%(ext)s", video));
        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-playlist")
            .arg("--no-progress")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("-f")
            .arg(FORMAT_SELECTOR)
            .arg("-o")
            .arg(template)
            .arg(video.watch_url())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Locate the finished download (`<id>.<ext>`, ignoring `.part` leftovers)
async fn find_downloaded_file(video: &VideoId, dest_dir: &Path) -> Option<PathBuf> {
    let prefix = format!("{}.", video);
    let mut entries = tokio::fs::read_dir(dest_dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix) && !name.ends_with(".part") && !name.ends_with(".ytdl") {
            return Some(entry.path());
        }
    }
    None
}

#[async_trait::async_trait]
impl VideoDownloader for YtDlpDownloader {
    async fn download(&self, video: &VideoId, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
        debug!(video_id = %video, program = %self.program.display(), "Starting yt-dlp");

        let output = self
            .command(video, dest_dir)
            .output()
            .await
            .map_err(DownloadError::Spawn)?;

        if !output.status.success() {
            return Err(DownloadError::Failed {
                status: describe_status(&output.status),
                stderr: stderr_tail(&output.stderr),
            });
        }

        find_downloaded_file(video, dest_dir)
            .await
            .ok_or_else(|| DownloadError::MissingOutput(dest_dir.join(format!("{}.*", video))))
    }
}
