//! Trivia API — error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use trivia_core::error::DomainError;
use trivia_fetch::{FetchFailure, FetchFailureKind};
use trivia_opentdb::OpenTdbError;
use uuid::Uuid;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote client could not be built.
    #[error("remote client error: {0}")]
    Remote(#[from] OpenTdbError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Seconds to wait before retrying, for rate-limit rejections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    /// Whether repeating the same request may succeed.
    pub retryable: bool,
    /// Whether the caller should lower a requested amount.
    pub reduce_request: bool,
}

/// HTTP-layer error.
#[derive(Debug)]
pub enum ApiError {
    /// A domain error from a port or a bounded context.
    Domain(DomainError),
    /// An aborted game fetch.
    Fetch(FetchFailureKind),
    /// The selected inventory has no categories to allocate from.
    EmptyInventory,
    /// No stored game has the requested id.
    GameNotFound(Uuid),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<FetchFailure> for ApiError {
    fn from(failure: FetchFailure) -> Self {
        Self::Fetch(failure.kind)
    }
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                DomainError::CategoryNotFound(_) => (StatusCode::NOT_FOUND, "category_not_found"),
                DomainError::InsufficientQuestions { .. } => {
                    (StatusCode::CONFLICT, "insufficient_questions")
                }
                DomainError::Infrastructure(_) => (StatusCode::BAD_GATEWAY, "infrastructure_error"),
            },
            ApiError::Fetch(kind) => match kind {
                FetchFailureKind::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
                FetchFailureKind::NoResults => (StatusCode::CONFLICT, "no_results"),
                FetchFailureKind::LocalSupplyExhausted { .. } => {
                    (StatusCode::CONFLICT, "local_supply_exhausted")
                }
                FetchFailureKind::InvalidParameter => (StatusCode::BAD_GATEWAY, "invalid_parameter"),
                FetchFailureKind::UnknownResponse(_) => (StatusCode::BAD_GATEWAY, "unknown_response"),
                FetchFailureKind::Transport(_) => (StatusCode::BAD_GATEWAY, "transport_failure"),
                FetchFailureKind::TokenNotFound => (StatusCode::SERVICE_UNAVAILABLE, "token_not_found"),
                FetchFailureKind::TokenEmpty => (StatusCode::SERVICE_UNAVAILABLE, "token_empty"),
                FetchFailureKind::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
                FetchFailureKind::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failure"),
            },
            ApiError::EmptyInventory => (StatusCode::CONFLICT, "empty_inventory"),
            ApiError::GameNotFound(_) => (StatusCode::NOT_FOUND, "game_not_found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.classify();

        let body = match &self {
            ApiError::Domain(err) => ErrorBody {
                error: error_code,
                message: err.to_string(),
                retry_after_secs: None,
                retryable: matches!(err, DomainError::Infrastructure(_)),
                reduce_request: matches!(err, DomainError::InsufficientQuestions { .. }),
            },
            ApiError::Fetch(kind) => ErrorBody {
                error: error_code,
                message: kind.to_string(),
                retry_after_secs: match kind {
                    FetchFailureKind::RateLimited { retry_after } => Some(retry_after.as_secs()),
                    _ => None,
                },
                retryable: kind.is_retryable(),
                reduce_request: kind.suggests_reducing_request(),
            },
            ApiError::EmptyInventory => ErrorBody {
                error: error_code,
                message: "the selected inventory lists no categories".to_owned(),
                retry_after_secs: None,
                retryable: false,
                reduce_request: false,
            },
            ApiError::GameNotFound(id) => ErrorBody {
                error: error_code,
                message: format!("game {id} not found"),
                retry_after_secs: None,
                retryable: false,
                reduce_request: false,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_category_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::CategoryNotFound(12).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_supply_failures_map_to_409() {
        assert_eq!(
            status_of(ApiError::Fetch(FetchFailureKind::LocalSupplyExhausted {
                request_index: 0,
                requested: 3,
                available: 1,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ApiError::Fetch(FetchFailureKind::NoResults)), StatusCode::CONFLICT);
    }

    #[test]
    fn test_rate_limit_maps_to_429() {
        assert_eq!(
            status_of(ApiError::Fetch(FetchFailureKind::RateLimited {
                retry_after: Duration::from_secs(6)
            })),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_transport_and_token_failures() {
        assert_eq!(
            status_of(ApiError::Fetch(FetchFailureKind::Transport("timeout".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ApiError::Fetch(FetchFailureKind::TokenEmpty)),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
