use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{endpoint} returned status {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the upstream answered with a non-success status.
    ///
    /// Transport and decoding failures are not "unavailable": the engine
    /// reports those as unexpected errors rather than per-call failures.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, AppError::UpstreamStatus { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::HttpClient(_) | AppError::Decode(_) | AppError::UpstreamStatus { .. } => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
