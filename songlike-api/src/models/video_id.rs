//! YouTube video identifier extraction
//!
//! Accepted URL shapes:
//! - `https://www.youtube.com/watch?v=ID` (extra query parameters ignored)
//! - `https://music.youtube.com/watch?v=ID`, `https://m.youtube.com/watch?v=ID`
//! - `https://youtu.be/ID`
//! - `https://www.youtube.com/shorts/ID`, `/embed/ID`, `/live/ID`

use std::fmt;
use thiserror::Error;
use url::Url;

const VIDEO_ID_LEN: usize = 11;

/// Video id parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not a YouTube URL: {0}")]
    UnsupportedHost(String),

    #[error("No video id in URL: {0}")]
    MissingId(String),

    #[error("Malformed video id: {0}")]
    MalformedId(String),
}

/// Validated 11-character YouTube video id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video id from a watch/share URL
    pub fn from_url(raw: &str) -> Result<Self, VideoIdError> {
        let url = Url::parse(raw.trim()).map_err(|_| VideoIdError::InvalidUrl(raw.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(VideoIdError::InvalidUrl(raw.to_string()));
        }

        let host = url
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .ok_or_else(|| VideoIdError::InvalidUrl(raw.to_string()))?;

        let candidate = if host == "youtu.be" {
            url.path_segments()
                .and_then(|mut segments| segments.next())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        } else if host == "youtube.com" || host.ends_with(".youtube.com") {
            let mut segments = url.path_segments().into_iter().flatten();
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("shorts") | Some("embed") | Some("live") => {
                    segments.next().filter(|s| !s.is_empty()).map(str::to_string)
                }
                _ => None,
            }
        } else {
            return Err(VideoIdError::UnsupportedHost(host));
        };

        let id = candidate.ok_or_else(|| VideoIdError::MissingId(raw.to_string()))?;
        Self::parse(&id)
    }

    /// Validate a bare video id
    pub fn parse(id: &str) -> Result<Self, VideoIdError> {
        let valid = id.len() == VIDEO_ID_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(VideoIdError::MalformedId(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL with every extra parameter stripped
    ///
    /// Playlist or timestamp parameters make the link-aggregation lookup miss,
    /// so this is what gets submitted.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
