//! AudD music recognition client
//!
//! Uploads an audio clip as multipart form data to `POST {base}/` with
//! `return=spotify` so the match carries a Spotify track id.
//!
//! Response shapes:
//! - match: `{"status":"success","result":{"title":..,"artist":..,"spotify":{"id":..}}}`
//! - no match: `{"status":"success","result":null}`
//! - failure: `{"status":"error","error":{"error_code":900,"error_message":..}}`

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::SongMatch;
use crate::services::USER_AGENT;
use crate::types::{AudioRecognizer, RecognitionError};

#[derive(Debug, Clone, Deserialize)]
pub struct AuddResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<AuddResult>,
    #[serde(default)]
    pub error: Option<AuddApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuddResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub spotify: Option<AuddSpotify>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuddSpotify {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuddApiError {
    pub error_code: i64,
    #[serde(default)]
    pub error_message: String,
}

impl AuddResponse {
    /// Convert to a match; results without a Spotify id cannot be liked
    pub fn into_match(self) -> Result<Option<SongMatch>, RecognitionError> {
        if self.status != "success" {
            let (code, message) = self
                .error
                .map(|e| (e.error_code, e.error_message))
                .unwrap_or((0, format!("status {}", self.status)));
            return Err(RecognitionError::Api(code, message));
        }

        let Some(result) = self.result else {
            return Ok(None);
        };

        match (result.title, result.artist, result.spotify) {
            (Some(title), Some(artist), Some(spotify)) => Ok(Some(SongMatch {
                title,
                artist,
                spotify_id: spotify.id,
            })),
            (title, artist, _) => {
                info!(
                    title = title.as_deref().unwrap_or(""),
                    artist = artist.as_deref().unwrap_or(""),
                    "AudD match has no Spotify id"
                );
                Ok(None)
            }
        }
    }
}

/// AudD API client
pub struct AuddClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl AuddClient {
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl AudioRecognizer for AuddClient {
    fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    async fn recognize(&self, clip: &Path) -> Result<Option<SongMatch>, RecognitionError> {
        let api_token = self
            .api_token
            .as_deref()
            .ok_or(RecognitionError::NotConfigured)?;

        let bytes = tokio::fs::read(clip).await?;
        debug!(clip = %clip.display(), bytes = bytes.len(), "Submitting clip to AudD");

        let file_name = clip
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.mp3".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let form = Form::new()
            .text("api_token", api_token.to_string())
            .text("return", "spotify")
            .part("file", part);

        let response = self
            .http_client
            .post(format!("{}/", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Api(i64::from(status.as_u16()), error_text));
        }

        let body: AuddResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))?;

        body.into_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clip_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ID3fake-mp3-bytes").unwrap();
        file
    }

    #[test]
    fn test_into_match_success() {
        let body: AuddResponse = serde_json::from_value(json!({
            "status": "success",
            "result": {
                "artist": "Daft Punk",
                "title": "Something About Us",
                "spotify": { "id": "1NeLwFETswx8Fzxl2AFl91" }
            }
        }))
        .unwrap();
        let song = body.into_match().unwrap().unwrap();
        assert_eq!(song.artist, "Daft Punk");
        assert_eq!(song.spotify_id, "1NeLwFETswx8Fzxl2AFl91");
    }

    #[test]
    fn test_into_match_null_result() {
        let body: AuddResponse =
            serde_json::from_value(json!({ "status": "success", "result": null })).unwrap();
        assert!(body.into_match().unwrap().is_none());
    }

    #[test]
    fn test_into_match_without_spotify_id() {
        let body: AuddResponse = serde_json::from_value(json!({
            "status": "success",
            "result": { "artist": "Someone", "title": "Obscure" }
        }))
        .unwrap();
        assert!(body.into_match().unwrap().is_none());
    }

    #[test]
    fn test_into_match_api_error() {
        let body: AuddResponse = serde_json::from_value(json!({
            "status": "error",
            "error": {
                "error_code": 900,
                "error_message": "Recognition failed: authorization failed"
            }
        }))
        .unwrap();
        let err = body.into_match().unwrap_err();
        assert!(matches!(err, RecognitionError::Api(900, _)));
    }

    #[tokio::test]
    async fn test_recognize_posts_multipart_clip() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/")
                    .body_contains("audd-token")
                    .body_contains("spotify")
                    .body_contains("ID3fake-mp3-bytes");
                then.status(200).json_body(json!({
                    "status": "success",
                    "result": {
                        "artist": "Daft Punk",
                        "title": "Something About Us",
                        "spotify": { "id": "1NeLwFETswx8Fzxl2AFl91" }
                    }
                }));
            })
            .await;

        let client = AuddClient::new(server.base_url(), Some("audd-token".to_string())).unwrap();
        let clip = clip_file();
        let song = client.recognize(clip.path()).await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(song.title, "Something About Us");
    }

    #[tokio::test]
    async fn test_recognize_without_token_is_not_configured() {
        let client = AuddClient::new("http://127.0.0.1:9", None).unwrap();
        let clip = clip_file();
        let err = client.recognize(clip.path()).await.unwrap_err();
        assert!(matches!(err, RecognitionError::NotConfigured));
    }

    #[tokio::test]
    async fn test_recognize_missing_clip_is_io_error() {
        let client = AuddClient::new("http://127.0.0.1:9", Some("t".to_string())).unwrap();
        let err = client
            .recognize(Path::new("/nonexistent/clip.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Io(_)));
    }
}
