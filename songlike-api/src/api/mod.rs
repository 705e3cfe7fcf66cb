//! HTTP API handlers
//!
//! - `GET /` and `GET /health`: liveness
//! - `POST /api/like_song`: identify a video's song and like it

pub mod health;
pub mod like_song;

pub use health::health_routes;
pub use like_song::like_song_routes;

use axum::{http::StatusCode, Json};
use songlike_common::api::ErrorResponse;

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("404 page not found")))
}
