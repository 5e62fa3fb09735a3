use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Browser session error: {0}")]
    Browser(String),

    #[error("Navigation timed out: {0}")]
    NavigationTimeout(String),

    #[error("Content selector timed out: {0}")]
    SelectorTimeout(String),

    #[error("LLM processing error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Callers only ever see a generic line; the underlying cause goes to
        // the operator log.
        let (status, error_message) = match &self {
            AppError::InvalidUrl(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Browser(_) | AppError::NavigationTimeout(_) | AppError::SelectorTimeout(_) => {
                tracing::error!(error = %self, "extraction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to extract chat content.".to_string(),
                )
            }
            AppError::Llm(_) | AppError::Config(_) => {
                tracing::error!(error = %self, "summarization failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate summary.".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Llm(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
