//! HTTP-facing application error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::llm::LlmError;

/// Result alias for HTTP handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// Server-side configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation backend failure
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
