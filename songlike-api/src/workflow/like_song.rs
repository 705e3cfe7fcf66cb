//! Identify-and-like workflow behind `POST /api/like_song`
//!
//! 1. Link-aggregation lookup by URL.
//! 2. On a miss (or lookup failure), the recognition pipeline.
//! 3. On a match from either phase, save the track for the caller.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use songlike_common::api::{LikeSongRequest, MatchSource, SongData};
use songlike_common::config::is_valid_key;

use crate::models::{SongMatch, VideoId, VideoIdError};
use crate::types::{LikeError, SongLookup, TrackLiker};
use crate::workflow::recognition::{PipelineError, RecognitionPipeline};

/// Workflow errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid video URL: {0}")]
    InvalidVideoUrl(#[from] VideoIdError),

    #[error("Missing access token")]
    MissingAccessToken,

    #[error("Failed to find song info")]
    NotFound,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to like track: {0}")]
    Like(#[from] LikeError),
}

/// Lookup → fallback → like orchestration
pub struct LikeSongWorkflow {
    lookup: Arc<dyn SongLookup>,
    liker: Arc<dyn TrackLiker>,
    pipeline: RecognitionPipeline,
}

impl LikeSongWorkflow {
    pub fn new(
        lookup: Arc<dyn SongLookup>,
        liker: Arc<dyn TrackLiker>,
        pipeline: RecognitionPipeline,
    ) -> Self {
        Self {
            lookup,
            liker,
            pipeline,
        }
    }

    /// Whether misses can fall back to audio recognition
    pub fn fallback_available(&self) -> bool {
        self.pipeline.is_available()
    }

    /// Identify the song for `request` and save it to the caller's library
    pub async fn run(&self, request: &LikeSongRequest) -> Result<SongData, WorkflowError> {
        if !is_valid_key(&request.access_token) {
            return Err(WorkflowError::MissingAccessToken);
        }
        let video = VideoId::from_url(&request.video_url)?;

        let (song, source) = match self.identify(&video).await? {
            Some(found) => found,
            None => {
                info!(video_id = %video, "No match found with Odesli or AudD");
                return Err(WorkflowError::NotFound);
            }
        };

        let like_status = self
            .liker
            .like_track(&song.spotify_id, &request.access_token)
            .await?;

        info!(
            video_id = %video,
            spotify_id = %song.spotify_id,
            source = ?source,
            like_status = like_status,
            "Song identified"
        );

        Ok(SongData {
            title: song.title,
            artist: song.artist,
            spotify_id: song.spotify_id,
            source,
            like_status: Some(like_status),
        })
    }

    async fn identify(
        &self,
        video: &VideoId,
    ) -> Result<Option<(SongMatch, MatchSource)>, WorkflowError> {
        info!(video_id = %video, lookup = self.lookup.name(), "Matching with link lookup");
        match self.lookup.lookup(video).await {
            Ok(Some(song)) => return Ok(Some((song, MatchSource::Odesli))),
            Ok(None) => info!(video_id = %video, "No match found with Odesli"),
            // A lookup outage should not block the fallback
            Err(e) => warn!(video_id = %video, error = %e, "Link lookup failed, falling back"),
        }

        if !self.pipeline.is_available() {
            warn!(video_id = %video, "Audio recognition not configured, skipping fallback");
            return Ok(None);
        }

        Ok(self
            .pipeline
            .identify(video)
            .await?
            .map(|song| (song, MatchSource::Audd)))
    }
}
