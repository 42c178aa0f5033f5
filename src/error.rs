use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Everything a request can fail with, as seen at the HTTP boundary.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("API key is not configured")]
    Configuration,
    #[error("Prompt is required")]
    Validation,
    #[error("Failed to generate image")]
    Upstream { status: StatusCode },
    #[error("An image is already being generated")]
    Busy,
    #[error("Image generation timed out")]
    Timeout,
    #[error("Image not found")]
    NotFound,
    #[error("An unexpected error occurred")]
    Unexpected(#[from] anyhow::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Validation => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status } => *status,
            RelayError::Busy => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Unexpected(err.into())
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        if let RelayError::Unexpected(err) = &self {
            tracing::error!("unexpected error: {err:#}");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
