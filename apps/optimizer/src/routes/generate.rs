use axum::{extract::State, Json};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub content: String,
}

/// POST /api
///
/// Body `{ "promptText": string }`. The prompt is forwarded as-is to the
/// model; no retries.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = parse_prompt(&body)?;
    let llm = state.llm.as_ref().ok_or(ApiError::Configuration)?;

    debug!("Generating content for a {}-character prompt", prompt.chars().count());
    let content = llm.generate(&prompt).await?;
    Ok(Json(GenerateResponse { content }))
}

/// GET /api
pub async fn handle_generate_info() -> Json<Value> {
    Json(json!({
        "message": "Este é um endpoint para gerar conteúdo com POST."
    }))
}

/// Malformed JSON, a missing field, a non-string and an empty string are all
/// the same client error.
fn parse_prompt(body: &[u8]) -> Result<String, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("Rejecting generate request with malformed JSON: {e}");
        ApiError::InvalidPrompt
    })?;
    match value.get("promptText") {
        Some(Value::String(prompt)) if !prompt.is_empty() => Ok(prompt.clone()),
        _ => Err(ApiError::InvalidPrompt),
    }
}
