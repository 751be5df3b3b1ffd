//! Application error taxonomy and its mapping to HTTP responses.
//!
//! Every error carries a machine-readable `code` in the JSON body so clients
//! can branch on the failure kind even though the current mobile app only
//! shows a generic alert.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug, Clone)]
pub enum AppError {
    /// Caller supplied a quiz type outside {MCQ, TOFQ, DNDQ}. Non-retryable.
    InvalidQuizType(String),

    /// An image entry is missing, not a string, or not decodable base64.
    /// Non-retryable.
    InvalidImageData(String),

    /// Request shape violation (empty prompt and the like). Non-retryable.
    BadRequest(String),

    /// The provider call failed or returned unusable output. Retryable at
    /// the caller's discretion; this service performs no internal retry.
    GenerationFailed(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidQuizType(_) => "INVALID_QUIZ_TYPE",
            AppError::InvalidImageData(_) => "INVALID_IMAGE_DATA",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidQuizType(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidImageData(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::InvalidQuizType(msg)
            | AppError::InvalidImageData(msg)
            | AppError::BadRequest(msg)
            | AppError::GenerationFailed(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with the matching status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::GenerationFailed(msg) = &self {
            tracing::error!(target: "generation", error = %msg, "Generation failed");
        }
        let body = Json(json!({
            "error": self.message(),
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}
