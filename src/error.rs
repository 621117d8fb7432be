//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::remote::RemoteError;

// == Storage Error Enum ==
/// Failures raised by a session storage backend.
///
/// These never escape the cache manager; they are logged and the write is
/// dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Writing the entry would exceed the backend's byte quota
    #[error("Storage quota exceeded: need {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Backend cannot be used (poisoned lock, missing facility)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Api Error Enum ==
/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Requested record or cache entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The remote store could not serve the request
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(msg) => ApiError::NotFound(msg),
            RemoteError::Invalid(msg) => ApiError::InvalidRequest(msg),
            RemoteError::Unavailable(msg) => ApiError::Upstream(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_mapping() {
        assert!(matches!(
            ApiError::from(RemoteError::NotFound("coach 1".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(RemoteError::Invalid("bad".into())),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from(RemoteError::Unavailable("down".into())),
            ApiError::Upstream(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let resp = ApiError::NotFound("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = ApiError::InvalidRequest("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = ApiError::Upstream("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_quota_message() {
        let err = StorageError::QuotaExceeded {
            needed: 10,
            quota: 5,
        };
        assert!(err.to_string().contains("quota"));
    }
}
