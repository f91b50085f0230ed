use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config at '{path}': expected {expected}")]
    InvalidType { path: String, expected: &'static str },
    #[error("Invalid config at '{path}': must be between {min} and {max}")]
    OutOfRange { path: String, min: u64, max: u64 },
    #[error("Failed to read config file {path}: {message}")]
    Unreadable { path: String, message: String },
    #[error("Invalid config: {0}")]
    Deserialize(String),
}

/// Faults raised by the embedding, completion and vector index clients.
///
/// These never leave the retrieval or generation components; they are logged
/// and converted into a notice plus a default value.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport { provider: &'static str, message: String },
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} response could not be decoded: {message}")]
    Decode { provider: &'static str, message: String },
    #[error("{provider} response did not contain {what}")]
    EmptyResponse {
        provider: &'static str,
        what: &'static str,
    },
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl ProviderError {
    pub fn transport<E: std::fmt::Display>(provider: &'static str, err: E) -> Self {
        ProviderError::Transport {
            provider,
            message: err.to_string(),
        }
    }

    pub fn decode<E: std::fmt::Display>(provider: &'static str, err: E) -> Self {
        ProviderError::Decode {
            provider,
            message: err.to_string(),
        }
    }
}

/// Runs `fut` under a deadline, mapping a breach to [`ProviderError::Timeout`].
pub async fn with_deadline<T, F>(
    operation: &'static str,
    after: Duration,
    fut: F,
) -> Result<T, ProviderError>
where
    F: std::future::Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout { operation, after }),
    }
}
