use std::sync::Arc;

use crate::extraction::TextExtractor;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when `GOOGLE_API_KEY` is missing; generation then fails fast.
    pub llm: Option<LlmClient>,
    /// Decoder used by `POST /api/upload`.
    pub extractor: Arc<dyn TextExtractor>,
}
