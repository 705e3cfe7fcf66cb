//! Fallback recognition pipeline: download → clip → fingerprint match
//!
//! Every run gets its own scratch directory under the configured work dir.
//! The directory and everything in it is removed when the run ends, whether
//! it matched, missed or failed. Only the download step is time-bounded.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{SongMatch, VideoId};
use crate::types::{
    AudioRecognizer, AudioTranscoder, DownloadError, RecognitionError, TranscodeError,
    VideoDownloader,
};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Tunables for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Upper bound on the download step
    pub download_timeout: Duration,
    /// Length of the clip submitted for recognition
    pub clip_length: Duration,
    /// Parent directory for per-run scratch directories (must exist)
    pub work_dir: PathBuf,
}

/// Download/transcode/recognize pipeline
pub struct RecognitionPipeline {
    downloader: Arc<dyn VideoDownloader>,
    transcoder: Arc<dyn AudioTranscoder>,
    recognizer: Arc<dyn AudioRecognizer>,
    settings: PipelineSettings,
}

impl RecognitionPipeline {
    pub fn new(
        downloader: Arc<dyn VideoDownloader>,
        transcoder: Arc<dyn AudioTranscoder>,
        recognizer: Arc<dyn AudioRecognizer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            downloader,
            transcoder,
            recognizer,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Whether the recognizer has credentials; without them running the
    /// pipeline would only waste a download.
    pub fn is_available(&self) -> bool {
        self.recognizer.is_configured()
    }

    /// Identify the song playing in `video`
    ///
    /// `Ok(None)` means the recognizer analysed the clip and found nothing.
    pub async fn identify(&self, video: &VideoId) -> Result<Option<SongMatch>, PipelineError> {
        let scratch = tempfile::Builder::new()
            .prefix(&format!("songlike-{}-", video))
            .tempdir_in(&self.settings.work_dir)
            .map_err(PipelineError::Scratch)?;

        let result = self.run_in(video, &scratch).await;
        cleanup(scratch);
        result
    }

    async fn run_in(
        &self,
        video: &VideoId,
        scratch: &TempDir,
    ) -> Result<Option<SongMatch>, PipelineError> {
        let started = Instant::now();

        info!(video_id = %video, "Downloading video");
        let timeout = self.settings.download_timeout;
        let media = match tokio::time::timeout(
            timeout,
            self.downloader.download(video, scratch.path()),
        )
        .await
        {
            Ok(result) => result?,
            Err(_elapsed) => {
                warn!(
                    video_id = %video,
                    timeout_secs = timeout.as_secs_f64(),
                    "Download timed out"
                );
                return Err(DownloadError::Timeout(timeout).into());
            }
        };
        debug!(
            video_id = %video,
            media = %media.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Download finished"
        );

        info!(video_id = %video, "Converting to audio clip");
        let clip = scratch.path().join(format!("{}.mp3", video));
        self.transcoder
            .extract_clip(&media, &clip, self.settings.clip_length)
            .await?;

        info!(video_id = %video, "Matching clip with AudD");
        let matched = self.recognizer.recognize(&clip).await?;

        debug!(
            video_id = %video,
            matched = matched.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recognition pipeline finished"
        );
        Ok(matched)
    }
}

fn cleanup(scratch: TempDir) {
    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(path = %path.display(), error = %e, "Failed to remove scratch directory");
    }
}
