use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum BlinksError {
    #[error("Failed to set global logger")]
    SetGlobalLogger(#[from] tracing_log::log_tracer::SetLoggerError),
    #[error("Failed to set global subscriber")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Store operation failed: {0}")]
    StoreOperation(#[from] redis::RedisError),
    #[error("Corrupt record at `{key}`: missing field `{field}`")]
    CorruptRecord { key: String, field: &'static str },
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<deadpool_redis::PoolError> for BlinksError {
    fn from(e: deadpool_redis::PoolError) -> Self {
        // Timeouts, a closed pool and refused connections all mean no usable connection.
        BlinksError::StoreUnavailable(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Blink not found")]
    NotFound,
    #[error("Blink URL already exists")]
    Conflict,
    #[error("Invalid JSON")]
    InvalidJson(#[from] JsonRejection),
    #[error(transparent)]
    Internal(#[from] BlinksError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Client errors are not logged; store failures are, and their details
        // stay in the logs rather than in the response body.
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "bad_request",
                    error: *msg,
                    details: None,
                },
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "not_found",
                    error: "Blink not found",
                    details: Some("No blink is registered under this URL".to_string()),
                },
            ),
            ApiError::Conflict => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "conflict",
                    error: "Blink URL already exists",
                    details: Some("Choose a different blink_url".to_string()),
                },
            ),
            ApiError::InvalidJson(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "invalid_json",
                    error: "Invalid JSON in request body",
                    details: Some(rejection.body_text()),
                },
            ),

            ApiError::Internal(BlinksError::StoreUnavailable(reason)) => {
                warn!(reason = %reason, "Store unavailable");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "store_unavailable",
                        error: "Store unavailable",
                        details: Some("Please try again later".to_string()),
                    },
                )
            }
            ApiError::Internal(other) => {
                error!(error = ?other, "Unexpected internal error");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "internal_error",
                        error: "Internal server error",
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            ApiError::BadRequest("nope").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(BlinksError::StoreUnavailable("timeout".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(BlinksError::CorruptRecord {
                key: "blink:x".into(),
                field: "created_at",
            })
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
