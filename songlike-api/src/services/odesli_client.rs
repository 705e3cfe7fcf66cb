//! Odesli (song.link) link-aggregation client
//!
//! Maps a YouTube watch URL to the equivalent Spotify entity:
//! `GET {base}/links?url=<watch url>&platform=youtube[&key=<api key>]`.
//! A match requires `linksByPlatform.spotify.entityUniqueId` and a matching
//! entry in `entitiesByUniqueId` carrying `id`, `title` and `artistName`.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::models::{SongMatch, VideoId};
use crate::services::USER_AGENT;
use crate::types::{LookupError, SongLookup};

const TARGET_PLATFORM: &str = "spotify";
const SOURCE_PLATFORM: &str = "youtube";

/// Odesli `/links` response (only the fields used here)
#[derive(Debug, Clone, Deserialize)]
pub struct OdesliResponse {
    #[serde(rename = "linksByPlatform", default)]
    pub links_by_platform: HashMap<String, OdesliPlatformLink>,
    #[serde(rename = "entitiesByUniqueId", default)]
    pub entities_by_unique_id: HashMap<String, OdesliEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OdesliPlatformLink {
    #[serde(rename = "entityUniqueId")]
    pub entity_unique_id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OdesliEntity {
    /// Platform-native id (the Spotify track id for Spotify entities)
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "artistName", default)]
    pub artist_name: Option<String>,
}

impl OdesliResponse {
    /// Extract the Spotify track for this response, if any
    pub fn spotify_match(&self) -> Option<SongMatch> {
        let link = self.links_by_platform.get(TARGET_PLATFORM)?;
        let entity = self.entities_by_unique_id.get(&link.entity_unique_id)?;
        Some(SongMatch {
            title: entity.title.clone()?,
            artist: entity.artist_name.clone()?,
            spotify_id: entity.id.clone(),
        })
    }
}

/// Odesli API client
pub struct OdesliClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OdesliClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl SongLookup for OdesliClient {
    fn name(&self) -> &'static str {
        "odesli"
    }

    async fn lookup(&self, video: &VideoId) -> Result<Option<SongMatch>, LookupError> {
        let watch_url = video.watch_url();
        let mut params = vec![("url", watch_url.as_str()), ("platform", SOURCE_PLATFORM)];
        if let Some(key) = self.api_key.as_deref() {
            params.push(("key", key));
        }

        debug!(video_id = %video, "Querying Odesli");

        let response = self
            .http_client
            .get(format!("{}/links", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();

        // Odesli answers 400/404 when it cannot resolve the entity
        if status.as_u16() == 400 || status.as_u16() == 404 {
            debug!(video_id = %video, status = status.as_u16(), "Odesli could not resolve video");
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), error_text));
        }

        let body: OdesliResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        Ok(body.spotify_match())
    }
}
