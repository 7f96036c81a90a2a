/// Error types
///
/// - `RegistryError`: invalid probe registration, fatal at startup
/// - `ServerError`: anything that prevents the service from starting
/// - `ApiError`: errors rendered as JSON bodies by the HTTP surface

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Probe registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no probes registered")]
    Empty,

    #[error("probe registered with an empty name")]
    EmptyName,

    #[error("probe name registered twice: {0}")]
    DuplicateName(String),
}

/// Startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid probe registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("invalid database configuration: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid redis configuration: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-facing errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The requested resource was not found.")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "detail": self.to_string(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["detail"], "The requested resource was not found.");
    }

    #[test]
    fn test_internal_status() {
        let err = ApiError::Internal("encoder failed".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn test_registry_error_converts() {
        let err: ServerError = RegistryError::DuplicateName("redis".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid probe registry: probe name registered twice: redis"
        );
    }
}
