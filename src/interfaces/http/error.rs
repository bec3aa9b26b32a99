use crate::domain::errors::TradingError;
use crate::interfaces::http::dto::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Everything a handler can fail with, mapped onto an HTTP status.
///
/// Server-side failures are logged where they happen; the response body only
/// ever carries a generic message for them.
#[derive(Debug)]
pub enum ApiError {
    Trading(TradingError),
    MalformedBody(String),
}

impl From<TradingError> for ApiError {
    fn from(err: TradingError) -> Self {
        ApiError::Trading(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::MalformedBody(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", reason.clone())
            }
            ApiError::Trading(TradingError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", e.to_string())
            }
            ApiError::Trading(TradingError::StockNotFound { ticker }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Stock {} not found", ticker),
            ),
            ApiError::Trading(
                TradingError::RetriesExhausted { .. } | TradingError::Timeout { .. },
            ) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                "The service is busy, please retry.".to_string(),
            ),
            ApiError::Trading(TradingError::Storage(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An unexpected error occurred.".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();
        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
