use auction_types::errors::AuctionError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Central error type for the gateway
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not permit the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auction(#[from] AuctionError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "AUTHORIZATION_ERROR"),
            AppError::RateLimitExceeded(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Auction(err) => {
                let status = match err {
                    AuctionError::Validation(_) => StatusCode::BAD_REQUEST,
                    AuctionError::Rule(_) => StatusCode::CONFLICT,
                    AuctionError::Persistence(_) | AuctionError::Invariant(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.category())
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        let message = match &self {
            AppError::Internal(err) => {
                error!(error = %err, "Internal error");
                "Internal server error".to_string()
            }
            AppError::Auction(err) if status.is_server_error() => {
                error!(error = %err, code, "Auction operation failed");
                err.to_string()
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::RateLimitExceeded(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Auction(err) => err.to_string(),
        };

        let body = Json(json!({
            "status": "error",
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
