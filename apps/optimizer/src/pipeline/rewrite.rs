//! Rewrite client: sends extracted résumé text to the `/api` generation
//! endpoint wrapped in the fixed ATS instruction template.
//!
//! `Rewriter` is the seam the orchestrator depends on; `HttpRewriteClient` is
//! the production implementation. Failed calls are never retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pipeline::error::{PipelineError, GENERIC_UPSTREAM_MESSAGE};
use crate::pipeline::prompts::build_rewrite_prompt;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Body of `POST /api`. Built per call, never stored.
#[derive(Debug, Serialize)]
pub struct RewriteRequest {
    #[serde(rename = "promptText")]
    pub prompt_text: String,
}

impl RewriteRequest {
    pub fn for_resume(subject_text: &str) -> Self {
        Self {
            prompt_text: build_rewrite_prompt(subject_text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenText {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct RewriteSuccess {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RewriteFailure {
    error: Option<String>,
}

#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<RewrittenText, PipelineError>;
}

/// Calls a running `ats-optimizer-api` server over HTTP.
#[derive(Clone)]
pub struct HttpRewriteClient {
    client: Client,
    endpoint: String,
}

impl HttpRewriteClient {
    /// `server_url` is the server origin, e.g. `http://localhost:8080`.
    pub fn new(server_url: &str) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/api", server_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Rewriter for HttpRewriteClient {
    async fn rewrite(&self, text: &str) -> Result<RewrittenText, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("résumé text is empty".to_string()));
        }

        let request = RewriteRequest::for_resume(text);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Rewrite request to {} failed: {e}", self.endpoint);
                PipelineError::UpstreamError(GENERIC_UPSTREAM_MESSAGE.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read rewrite response body: {e}");
            PipelineError::UpstreamError(GENERIC_UPSTREAM_MESSAGE.to_string())
        })?;

        // Only 200 carries a rewrite; other 2xx codes are failures too.
        if status != StatusCode::OK {
            let message = serde_json::from_str::<RewriteFailure>(&body)
                .ok()
                .and_then(|f| f.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string());
            warn!("Rewrite endpoint returned {status}: {message}");
            return Err(PipelineError::UpstreamError(message));
        }

        let content = serde_json::from_str::<RewriteSuccess>(&body)
            .ok()
            .and_then(|s| s.content)
            .ok_or_else(|| {
                warn!("Rewrite response is missing the `content` field");
                PipelineError::UpstreamError(GENERIC_UPSTREAM_MESSAGE.to_string())
            })?;

        debug!("Rewrite succeeded: {} characters", content.chars().count());
        Ok(RewrittenText { text: content })
    }
}
