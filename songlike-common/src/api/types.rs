//! Request/response types for the browser extension API
//!
//! Field names follow the JSON the extension already sends and expects
//! (`videoUrl`, `accessToken`, `spotifyId`). The capitalized spellings
//! (`VideoUrl`, `AccessToken`) sent by older extension builds are accepted
//! as aliases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /api/like_song`
#[derive(Clone, Deserialize, Serialize)]
pub struct LikeSongRequest {
    /// Video page URL the user is currently watching
    #[serde(rename = "videoUrl", alias = "VideoUrl", alias = "video_url")]
    pub video_url: String,

    /// Streaming-service OAuth access token, forwarded as a bearer token
    #[serde(rename = "accessToken", alias = "AccessToken", alias = "access_token")]
    pub access_token: String,
}

// Hand-written so the access token never ends up in logs.
impl fmt::Debug for LikeSongRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LikeSongRequest")
            .field("video_url", &self.video_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Which identification phase produced the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Link-aggregation lookup (song.link / Odesli)
    Odesli,
    /// Audio fingerprint recognition (AudD)
    Audd,
}

/// Identified song returned to the extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongData {
    pub title: String,
    pub artist: String,
    #[serde(rename = "spotifyId")]
    pub spotify_id: String,
    pub source: MatchSource,
    /// HTTP status returned by the "like track" call
    #[serde(rename = "likeStatus", skip_serializing_if = "Option::is_none", default)]
    pub like_status: Option<u16>,
}

/// Error body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeResponse {
    #[serde(rename = "Response")]
    pub response: String,
}

impl Default for HomeResponse {
    fn default() -> Self {
        Self {
            response: "Hello World!".to_string(),
        }
    }
}
