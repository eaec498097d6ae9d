use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::error::{CONFIGURATION_MESSAGE, GENERIC_UPSTREAM_MESSAGE};

pub const INVALID_PROMPT_MESSAGE: &str = "Prompt de texto inválido fornecido.";
pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Unsupported file type";
pub const FILE_PROCESSING_MESSAGE: &str = "Failed to process file";
pub const MULTIPART_PARSE_MESSAGE: &str = "Error parsing the files";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File too large";

/// HTTP-surface error type.
/// Implements `IntoResponse` so handlers can return `Result<T, ApiError>`;
/// every variant renders as `{ "error": message }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid promptText")]
    InvalidPrompt,

    #[error("Generation credential is not configured")]
    Configuration,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Upload exceeds the size limit")]
    UploadTooLarge,

    #[error("Multipart error: {0}")]
    Multipart(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidPrompt => (StatusCode::BAD_REQUEST, INVALID_PROMPT_MESSAGE.to_string()),
            ApiError::Configuration => {
                tracing::error!("GOOGLE_API_KEY is not set; rejecting generation request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONFIGURATION_MESSAGE.to_string(),
                )
            }
            ApiError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_UPSTREAM_MESSAGE.to_string(),
                )
            }
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UploadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                FILE_TOO_LARGE_MESSAGE.to_string(),
            ),
            ApiError::Multipart(detail) => {
                tracing::error!("Failed to read multipart upload: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    MULTIPART_PARSE_MESSAGE.to_string(),
                )
            }
            ApiError::Extraction(detail) => {
                tracing::error!("Upload extraction failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FILE_PROCESSING_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
