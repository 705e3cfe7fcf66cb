//! Spotify Web API client: "Save tracks for current user"
//!
//! `PUT {base}/me/tracks?ids=<id>` authorized with the caller's bearer token.
//! The token belongs to the extension user and is never stored.

use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};

use crate::services::USER_AGENT;
use crate::types::{LikeError, TrackLiker};

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LikeError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| LikeError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TrackLiker for SpotifyClient {
    async fn like_track(&self, spotify_id: &str, access_token: &str) -> Result<u16, LikeError> {
        debug!(spotify_id = spotify_id, "Saving track to liked songs");

        let response = self
            .http_client
            .put(format!("{}/me/tracks", self.base_url))
            .query(&[("ids", spotify_id)])
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, "application/json")
            // Spotify rejects a PUT without Content-Length (411)
            .body(Vec::new())
            .send()
            .await
            .map_err(|e| LikeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                spotify_id = spotify_id,
                status = status.as_u16(),
                body = %error_text,
                "Spotify rejected like request"
            );
        }

        Ok(status.as_u16())
    }
}
