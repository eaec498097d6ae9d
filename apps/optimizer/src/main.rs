use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_optimizer::config::Config;
use ats_optimizer::extraction::DocumentExtractor;
use ats_optimizer::llm_client::{self, LlmClient};
use ats_optimizer::routes::build_router;
use ats_optimizer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_optimizer={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // A missing key is not fatal: the server still answers GET /api and
    // uploads, and every generation request fails with a configuration error.
    let llm = match &config.google_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.gemini_api_base.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            error!("Erro: GOOGLE_API_KEY não está configurada no ambiente do servidor.");
            None
        }
    };

    let state = AppState {
        llm,
        extractor: Arc::new(DocumentExtractor),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
