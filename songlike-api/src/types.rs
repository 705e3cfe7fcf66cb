//! External service seams
//!
//! Each external dependency (lookup API, playlist API, downloader, transcoder,
//! recognizer) sits behind a trait so the workflow can be driven by fakes in
//! tests. Production implementations live in [`crate::services`].
//!
//! # Example
//! ```rust,ignore
//! use songlike_api::types::{SongLookup, LookupError};
//!
//! struct AlwaysMiss;
//!
//! #[async_trait::async_trait]
//! impl SongLookup for AlwaysMiss {
//!     fn name(&self) -> &'static str { "always-miss" }
//!     async fn lookup(&self, _video: &VideoId) -> Result<Option<SongMatch>, LookupError> {
//!         Ok(None)
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::{SongMatch, VideoId};

// ============================================================================
// Errors
// ============================================================================

/// Metadata lookup errors
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// "Like track" call errors (transport only; HTTP statuses are reported, not raised)
#[derive(Debug, Error)]
pub enum LikeError {
    #[error("Network error: {0}")]
    Network(String),
}

/// Video download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to start downloader: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Downloader exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Download timed out after {0:?}")]
    Timeout(Duration),

    #[error("Downloader produced no file at {0}")]
    MissingOutput(PathBuf),
}

/// Audio transcode errors
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to start transcoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Transcoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Transcoder produced no file at {0}")]
    MissingOutput(PathBuf),
}

/// Audio recognition errors
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Recognition API token not configured")]
    NotConfigured,

    #[error("Failed to read audio clip: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(i64, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Traits
// ============================================================================

/// Resolves a video to song metadata without touching the media itself
#[async_trait::async_trait]
pub trait SongLookup: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the service answered but knows no matching track
    async fn lookup(&self, video: &VideoId) -> Result<Option<SongMatch>, LookupError>;
}

/// Adds a track to the caller's liked-songs playlist
#[async_trait::async_trait]
pub trait TrackLiker: Send + Sync {
    /// Returns the HTTP status code of the playlist API response
    async fn like_track(&self, spotify_id: &str, access_token: &str) -> Result<u16, LikeError>;
}

/// Downloads the media behind a video id
#[async_trait::async_trait]
pub trait VideoDownloader: Send + Sync {
    /// Downloads into `dest_dir` and returns the path of the media file.
    ///
    /// Dropping the returned future must abort the download.
    async fn download(&self, video: &VideoId, dest_dir: &Path) -> Result<PathBuf, DownloadError>;
}

/// Cuts a short audio clip out of a media file
#[async_trait::async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Writes the first `clip` of `input`'s audio to `output` as MP3
    async fn extract_clip(
        &self,
        input: &Path,
        output: &Path,
        clip: Duration,
    ) -> Result<(), TranscodeError>;
}

/// Identifies a song from an audio clip
#[async_trait::async_trait]
pub trait AudioRecognizer: Send + Sync {
    /// Whether credentials are present; the pipeline skips the download
    /// entirely when this is false.
    fn is_configured(&self) -> bool {
        true
    }

    /// `Ok(None)` means the clip was analysed but matched nothing
    async fn recognize(&self, clip: &Path) -> Result<Option<SongMatch>, RecognitionError>;
}
