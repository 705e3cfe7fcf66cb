//! songlike-api library interface
//!
//! Receives a video URL and an access token from the browser extension,
//! identifies the song (link lookup first, audio recognition as fallback)
//! and saves it to the user's liked songs.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod types;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::services::{AuddClient, FfmpegTranscoder, OdesliClient, SpotifyClient, YtDlpDownloader};
use crate::workflow::{LikeSongWorkflow, PipelineSettings, RecognitionPipeline};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Identify-and-like workflow
    pub workflow: Arc<LikeSongWorkflow>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last request error for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(workflow: LikeSongWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Wire the production clients from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> songlike_common::Result<Self> {
        let lookup = OdesliClient::new(&config.endpoints.odesli, config.odesli_api_key.clone())
            .map_err(client_error)?;
        let liker = SpotifyClient::new(&config.endpoints.spotify).map_err(client_error)?;
        let recognizer = AuddClient::new(&config.endpoints.audd, config.audd_api_token.clone())
            .map_err(client_error)?;

        let pipeline = RecognitionPipeline::new(
            Arc::new(YtDlpDownloader::new(&config.ytdlp_path)),
            Arc::new(FfmpegTranscoder::new(&config.ffmpeg_path)),
            Arc::new(recognizer),
            PipelineSettings {
                download_timeout: config.download_timeout,
                clip_length: config.clip_length,
                work_dir: config.work_dir.clone(),
            },
        );

        Ok(Self::new(LikeSongWorkflow::new(
            Arc::new(lookup),
            Arc::new(liker),
            pipeline,
        )))
    }
}

fn client_error(e: impl std::fmt::Display) -> songlike_common::Error {
    songlike_common::Error::ClientSetup(e.to_string())
}

const CORS_METHODS: [Method; 4] = [Method::POST, Method::GET, Method::OPTIONS, Method::PUT];
const CORS_METHODS_VALUE: &str = "POST, GET, OPTIONS, PUT";
const CORS_HEADERS_VALUE: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

/// CORS policy for the browser extension
///
/// Any origin; the methods and headers the extension sends.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(CORS_METHODS)
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            HeaderName::from_static("x-csrf-token"),
            header::AUTHORIZATION,
        ])
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::like_song_routes())
        .fallback(api::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        // CorsLayer only sets these on preflights; every response carries them
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_METHODS_VALUE),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_HEADERS_VALUE),
        ))
}
