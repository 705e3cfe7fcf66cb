//! `POST /api/like_song`

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use songlike_common::api::{LikeSongRequest, SongData};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/like_song
///
/// Body: `{"videoUrl": "...", "accessToken": "..."}`, parsed whatever the
/// Content-Type says (extension builds post it as `text/plain` or bare).
/// Returns the identified song, or `{"error": "..."}`.
pub async fn like_song(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<SongData>> {
    let request: LikeSongRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;
    info!(video_url = %request.video_url, "Like song request");

    match state.workflow.run(&request).await {
        Ok(song) => Ok(Json(song)),
        Err(e) => {
            let api_error = ApiError::from(e);
            *state.last_error.write().await = Some(api_error.to_string());
            Err(api_error)
        }
    }
}

/// OPTIONS /api/like_song
///
/// CORS headers come from the router's CORS layer; this only makes bare
/// OPTIONS requests (without `Access-Control-Request-Method`) succeed too.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Build like-song routes
pub fn like_song_routes() -> Router<AppState> {
    Router::new().route("/api/like_song", post(like_song).options(preflight))
}
