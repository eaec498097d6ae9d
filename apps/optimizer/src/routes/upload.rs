use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::{ApiError, NO_FILE_MESSAGE, UNSUPPORTED_FILE_MESSAGE};
use crate::extraction::Format;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
/// Request body cap for `/api/upload` (axum's default is 2 MB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub content: String,
}

/// POST /api/upload
///
/// Multipart form with a single `file` field. Extracts the text server-side
/// and returns it; nothing is stored.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::Validation(NO_FILE_MESSAGE.to_string()))?;
    let format = Format::from_file_name(&file_name)
        .map_err(|_| ApiError::Validation(UNSUPPORTED_FILE_MESSAGE.to_string()))?;

    let extractor = state.extractor.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes, format))
        .await
        .map_err(|e| ApiError::Extraction(e.to_string()))?
        .map_err(|e| ApiError::Extraction(e.to_string()))?;

    info!(
        "Extracted {} characters from uploaded {} file {file_name}",
        text.chars().count(),
        format.label()
    );
    Ok(Json(UploadResponse {
        message: "Arquivo lido com sucesso!".to_string(),
        content: text,
    }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::UploadTooLarge
    } else {
        ApiError::Multipart(err.body_text())
    }
}
