//! API error type
//!
//! Every error response has the body `{"error": "<message>"}`, the shape the
//! browser extension already understands.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use songlike_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

use crate::types::DownloadError;
use crate::workflow::{PipelineError, WorkflowError};

/// Message for requests neither phase could identify
pub const NOT_FOUND_MESSAGE: &str = "Failed to find song info";
/// Message for a failed or timed-out download
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download video";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No song found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Video download failed or timed out (500)
    #[error("Download failed: {0}")]
    DownloadFailed(#[source] DownloadError),

    /// Transcode, recognition or playlist call failed (500)
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DownloadFailed(_) | ApiError::Upstream(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client (internal details stay in the logs)
    pub fn client_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::DownloadFailed(_) => DOWNLOAD_FAILED_MESSAGE.to_string(),
            ApiError::Upstream(msg) => msg.clone(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidVideoUrl(e) => ApiError::BadRequest(e.to_string()),
            WorkflowError::MissingAccessToken => {
                ApiError::BadRequest("accessToken is required".to_string())
            }
            WorkflowError::NotFound => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            WorkflowError::Pipeline(PipelineError::Download(e)) => ApiError::DownloadFailed(e),
            WorkflowError::Pipeline(PipelineError::Scratch(e)) => ApiError::Internal(e.to_string()),
            WorkflowError::Pipeline(PipelineError::Transcode(e)) => {
                error!(error = %e, "Transcode failed");
                ApiError::Upstream("Failed to extract audio".to_string())
            }
            WorkflowError::Pipeline(PipelineError::Recognition(e)) => {
                error!(error = %e, "Recognition failed");
                ApiError::Upstream("Audio recognition failed".to_string())
            }
            WorkflowError::Like(e) => {
                error!(error = %e, "Like request failed");
                ApiError::Upstream("Failed to like track".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoIdError;
    use crate::types::TranscodeError;
    use std::time::Duration;

    #[test]
    fn test_workflow_error_mapping() {
        let cases: Vec<(WorkflowError, StatusCode, &str)> = vec![
            (
                WorkflowError::NotFound,
                StatusCode::NOT_FOUND,
                NOT_FOUND_MESSAGE,
            ),
            (
                WorkflowError::MissingAccessToken,
                StatusCode::BAD_REQUEST,
                "accessToken is required",
            ),
            (
                WorkflowError::Pipeline(PipelineError::Download(DownloadError::Timeout(
                    Duration::from_secs(10),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
                DOWNLOAD_FAILED_MESSAGE,
            ),
            (
                WorkflowError::Pipeline(PipelineError::Transcode(TranscodeError::MissingOutput(
                    "/tmp/x.mp3".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract audio",
            ),
        ];

        for (err, status, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.client_message(), message);
        }
    }

    #[test]
    fn test_invalid_url_is_bad_request() {
        let err = WorkflowError::InvalidVideoUrl(VideoIdError::UnsupportedHost("vimeo.com".into()));
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert!(api.client_message().contains("vimeo.com"));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let api = ApiError::Internal("/var/tmp/secret path".to_string());
        assert_eq!(api.client_message(), "Internal server error");
    }
}
