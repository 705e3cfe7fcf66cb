//! Test doubles for the external service seams

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use songlike_api::models::{SongMatch, VideoId};
use songlike_api::types::{
    AudioRecognizer, AudioTranscoder, DownloadError, LikeError, LookupError, RecognitionError,
    SongLookup, TrackLiker, TranscodeError, VideoDownloader,
};
use songlike_api::workflow::{LikeSongWorkflow, PipelineSettings, RecognitionPipeline};

pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1234";

pub fn song(title: &str, artist: &str, id: &str) -> SongMatch {
    SongMatch {
        title: title.to_string(),
        artist: artist.to_string(),
        spotify_id: id.to_string(),
    }
}

// ----------------------------------------------------------------------------
// Lookup
// ----------------------------------------------------------------------------

pub enum LookupAnswer {
    Found(SongMatch),
    Miss,
    Fail,
}

pub struct FakeLookup {
    answer: LookupAnswer,
    pub calls: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn new(answer: LookupAnswer) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl SongLookup for FakeLookup {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn lookup(&self, video: &VideoId) -> Result<Option<SongMatch>, LookupError> {
        self.calls.lock().unwrap().push(video.to_string());
        match &self.answer {
            LookupAnswer::Found(song) => Ok(Some(song.clone())),
            LookupAnswer::Miss => Ok(None),
            LookupAnswer::Fail => Err(LookupError::Network("connection refused".to_string())),
        }
    }
}

// ----------------------------------------------------------------------------
// Liker
// ----------------------------------------------------------------------------

pub struct FakeLiker {
    status: u16,
    fail: bool,
    /// (spotify id, access token) per call
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeLiker {
    pub fn with_status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl TrackLiker for FakeLiker {
    async fn like_track(&self, spotify_id: &str, access_token: &str) -> Result<u16, LikeError> {
        self.calls
            .lock()
            .unwrap()
            .push((spotify_id.to_string(), access_token.to_string()));
        if self.fail {
            return Err(LikeError::Network("connection reset".to_string()));
        }
        Ok(self.status)
    }
}

// ----------------------------------------------------------------------------
// Pipeline stages
// ----------------------------------------------------------------------------

pub struct FakeDownloader {
    delay: Duration,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeDownloader {
    pub fn instant() -> Arc<Self> {
        Self::new(Duration::ZERO, false)
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::new(delay, false)
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Duration::ZERO, true)
    }

    fn new(delay: Duration, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            delay,
            fail,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VideoDownloader for FakeDownloader {
    async fn download(&self, video: &VideoId, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(DownloadError::Failed {
                status: "exit code 1".to_string(),
                stderr: "ERROR: Video unavailable".to_string(),
            });
        }
        let path = dest_dir.join(format!("{}.m4a", video));
        tokio::fs::write(&path, b"media")
            .await
            .map_err(DownloadError::Spawn)?;
        Ok(path)
    }
}

#[derive(Default)]
pub struct FakeTranscoder {
    pub calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AudioTranscoder for FakeTranscoder {
    async fn extract_clip(
        &self,
        _input: &Path,
        output: &Path,
        _clip: Duration,
    ) -> Result<(), TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output, b"clip")
            .await
            .map_err(TranscodeError::Spawn)?;
        Ok(())
    }
}

pub struct FakeRecognizer {
    answer: Option<SongMatch>,
    configured: bool,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn matching(song: SongMatch) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(song),
            configured: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn no_match() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            configured: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            configured: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AudioRecognizer for FakeRecognizer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn recognize(&self, _clip: &Path) -> Result<Option<SongMatch>, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

// ----------------------------------------------------------------------------
// Assembly
// ----------------------------------------------------------------------------

pub fn pipeline_settings(work_dir: &Path, download_timeout: Duration) -> PipelineSettings {
    PipelineSettings {
        download_timeout,
        clip_length: Duration::from_secs(24),
        work_dir: work_dir.to_path_buf(),
    }
}

pub fn build_workflow(
    lookup: Arc<FakeLookup>,
    liker: Arc<FakeLiker>,
    downloader: Arc<FakeDownloader>,
    transcoder: Arc<FakeTranscoder>,
    recognizer: Arc<FakeRecognizer>,
    settings: PipelineSettings,
) -> LikeSongWorkflow {
    let pipeline = RecognitionPipeline::new(downloader, transcoder, recognizer, settings);
    LikeSongWorkflow::new(lookup, liker, pipeline)
}
