//! Liveness endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use songlike_common::api::HomeResponse;

use crate::AppState;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when only the link lookup can identify songs
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    /// Whether the download/recognize fallback has credentials
    pub recognition_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /
///
/// The extension pings this to wake the service before posting.
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse::default())
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;
    let recognition_fallback = state.workflow.fallback_available();

    Json(HealthResponse {
        status: if recognition_fallback { "ok" } else { "degraded" },
        service: "songlike-api",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        recognition_fallback,
        last_error: state.last_error.read().await.clone(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
}
