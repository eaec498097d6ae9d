//! Command-line front end for the résumé pipeline.
//!
//! Uploads a local PDF or Word file, shows a preview of the extracted text,
//! asks a running `ats-optimizer-api` server to rewrite it, and saves the
//! optimized PDF into `--out-dir`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_optimizer::export::{DirectorySink, PdfExporter};
use ats_optimizer::extraction::DocumentExtractor;
use ats_optimizer::pipeline::{
    HttpRewriteClient, Notification, NotificationLevel, Orchestrator, PipelineState,
    SessionSnapshot, Stages,
};

/// Rewrite a résumé into an ATS-friendly PDF.
#[derive(Parser, Debug)]
#[command(name = "optimize", version, arg_required_else_help = true)]
struct Cli {
    /// Résumé to optimize (.pdf, .doc or .docx).
    file: PathBuf,

    /// Origin of the ats-optimizer-api server.
    #[arg(long, env = "OPTIMIZER_API_URL", default_value = "http://localhost:8080")]
    server: String,

    /// Directory the optimized PDF is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Stop after printing the extracted text.
    #[arg(long)]
    extract_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let file_name = cli
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid file name: {}", cli.file.display()))?
        .to_string();
    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("cannot read {}", cli.file.display()))?;

    let orchestrator = Orchestrator::spawn(Stages {
        extractor: Arc::new(DocumentExtractor),
        rewriter: Arc::new(HttpRewriteClient::new(&cli.server)?),
        exporter: Arc::new(PdfExporter::default()),
        sink: Arc::new(DirectorySink::new(&cli.out_dir)),
    });

    let token = orchestrator.upload(file_name, bytes).await?;
    let extracted = orchestrator.wait_until_settled(token).await?;
    print_notification(extracted.notification.as_ref());
    ensure_not_failed(&extracted)?;
    if let Some(displayed) = &extracted.displayed {
        println!("\n{}\n", displayed.preview());
    }

    if cli.extract_only {
        return Ok(());
    }

    let mut updates = orchestrator.subscribe();
    orchestrator.optimize().await?;

    let mut last_notification = None;
    loop {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.token != token {
            bail!("session was replaced");
        }
        if snapshot.notification != last_notification {
            print_notification(snapshot.notification.as_ref());
            last_notification = snapshot.notification.clone();
        }
        if !snapshot.state.is_busy() {
            ensure_not_failed(&snapshot)?;
            if let Some(path) = &snapshot.saved_to {
                println!("{}", path.display());
            }
            return Ok(());
        }
        updates.changed().await.context("pipeline stopped unexpectedly")?;
    }
}

fn print_notification(notification: Option<&Notification>) {
    if let Some(notification) = notification {
        let marker = match notification.level {
            NotificationLevel::Info => "…",
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✗",
        };
        eprintln!("{marker} {}", notification.message);
    }
}

fn ensure_not_failed(snapshot: &SessionSnapshot) -> Result<()> {
    if snapshot.state == PipelineState::Error {
        let message = snapshot
            .notification
            .as_ref()
            .map(|n| n.message.clone())
            .unwrap_or_default();
        bail!(message);
    }
    Ok(())
}
