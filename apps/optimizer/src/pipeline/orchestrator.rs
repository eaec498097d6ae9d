//! Pipeline orchestrator. Owns the session and sequences
//! extract → rewrite → export, one stage at a time.
//!
//! # Architecture
//! - `Orchestrator` is a cheap cloneable handle; the session lives in a single
//!   actor task that processes commands and stage-completion events in order.
//! - Each stage runs in its own task (`spawn_blocking` for the CPU-bound
//!   extract/export and the file save, plain `spawn` for the network rewrite)
//!   and posts a `StageEvent` tagged with the session token that started it.
//! - An event is applied only if its token is the current session's and the
//!   session is still in the stage that produced it. Results of work abandoned
//!   by a new upload are dropped on arrival.
//! - Every transition publishes a fresh `SessionSnapshot` on a watch channel.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::export::{ArtifactSink, ExportedArtifact, Exporter};
use crate::extraction::{ExtractedText, Format, TextExtractor, UploadedDocument};
use crate::pipeline::error::PipelineError;
use crate::pipeline::rewrite::{RewrittenText, Rewriter};
use crate::pipeline::session::{
    Notification, PipelineState, Session, SessionSnapshot, SessionText, SessionToken,
};

const REWRITING_MESSAGE: &str = "Otimizando o currículo com IA...";
const EXPORTING_MESSAGE: &str = "Gerando o PDF otimizado...";
const DONE_MESSAGE: &str = "PDF otimizado gerado com sucesso!";
const BUSY_MESSAGE: &str = "Aguarde o processamento atual terminar.";
const NOTHING_TO_OPTIMIZE_MESSAGE: &str = "Envie um documento antes de otimizar.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("orchestrator task has shut down")]
    Closed,

    #[error("{0}")]
    Rejected(String),
}

/// The four collaborators the orchestrator drives.
#[derive(Clone)]
pub struct Stages {
    pub extractor: Arc<dyn TextExtractor>,
    pub rewriter: Arc<dyn Rewriter>,
    pub exporter: Arc<dyn Exporter>,
    pub sink: Arc<dyn ArtifactSink>,
}

enum Command {
    Upload {
        file_name: String,
        bytes: Vec<u8>,
        reply: oneshot::Sender<SessionToken>,
    },
    Optimize {
        reply: oneshot::Sender<Result<SessionToken, OrchestratorError>>,
    },
}

enum StageEvent {
    Extracted {
        token: SessionToken,
        result: Result<String, PipelineError>,
    },
    Rewritten {
        token: SessionToken,
        result: Result<RewrittenText, PipelineError>,
    },
    Exported {
        token: SessionToken,
        rewritten: RewrittenText,
        result: Result<ExportedArtifact, PipelineError>,
    },
    Saved {
        token: SessionToken,
        rewritten: RewrittenText,
        result: Result<PathBuf, PipelineError>,
    },
}

impl StageEvent {
    fn token(&self) -> SessionToken {
        match self {
            StageEvent::Extracted { token, .. }
            | StageEvent::Rewritten { token, .. }
            | StageEvent::Exported { token, .. }
            | StageEvent::Saved { token, .. } => *token,
        }
    }

    /// The state the session must still be in for this event to apply.
    fn expected_state(&self) -> PipelineState {
        match self {
            StageEvent::Extracted { .. } => PipelineState::Extracting,
            StageEvent::Rewritten { .. } => PipelineState::Rewriting,
            // Saving is the tail of the export stage.
            StageEvent::Exported { .. } | StageEvent::Saved { .. } => PipelineState::Exporting,
        }
    }

    fn stage_name(&self) -> &'static str {
        match self {
            StageEvent::Extracted { .. } => "extraction",
            StageEvent::Rewritten { .. } => "rewrite",
            StageEvent::Exported { .. } => "export",
            StageEvent::Saved { .. } => "save",
        }
    }
}

/// Handle to a running orchestrator. Dropping every handle stops the actor.
#[derive(Clone)]
pub struct Orchestrator {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl Orchestrator {
    /// Starts the actor on the current tokio runtime.
    pub fn spawn(stages: Stages) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = Session::new(0, None);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

        let actor = Actor {
            stages,
            session,
            last_token: 0,
            events: event_tx,
            snapshots: snapshot_tx,
        };
        tokio::spawn(actor.run(command_rx, event_rx));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    /// Starts a new session for `file_name`, discarding whatever came before
    /// (including work still in flight). Returns the new session's token.
    pub async fn upload(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<SessionToken, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Upload {
                file_name: file_name.into(),
                bytes,
                reply,
            })
            .map_err(|_| OrchestratorError::Closed)?;
        response.await.map_err(|_| OrchestratorError::Closed)
    }

    /// Rewrites and exports the extracted text of the current session.
    /// Only accepted while the session is `Extracted`.
    pub async fn optimize(&self) -> Result<SessionToken, OrchestratorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Optimize { reply })
            .map_err(|_| OrchestratorError::Closed)?;
        response.await.map_err(|_| OrchestratorError::Closed)?
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until session `token` has no stage in flight, or has been
    /// replaced by a newer upload.
    pub async fn wait_until_settled(
        &self,
        token: SessionToken,
    ) -> Result<SessionSnapshot, OrchestratorError> {
        let mut snapshots = self.snapshots.clone();
        let settled = snapshots
            .wait_for(|s| s.token != token || !s.state.is_busy())
            .await
            .map_err(|_| OrchestratorError::Closed)?;
        Ok(settled.clone())
    }
}

struct Actor {
    stages: Stages,
    session: Session,
    last_token: SessionToken,
    events: mpsc::UnboundedSender<StageEvent>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Actor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<StageEvent>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }
        debug!("Orchestrator stopped (all handles dropped)");
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Upload {
                file_name,
                bytes,
                reply,
            } => {
                let token = self.start_upload(file_name, bytes);
                let _ = reply.send(token);
            }
            Command::Optimize { reply } => {
                let _ = reply.send(self.start_optimize());
            }
        }
    }

    fn start_upload(&mut self, file_name: String, bytes: Vec<u8>) -> SessionToken {
        if self.session.state.is_busy() {
            info!(
                "Abandoning session {} while {:?}; late results will be discarded",
                self.session.token, self.session.state
            );
        }
        self.last_token += 1;
        let token = self.last_token;
        // The previous session record is dropped here, text and all.
        self.session = Session::new(token, Some(file_name.clone()));

        match UploadedDocument::new(file_name, bytes) {
            Ok(document) => {
                info!(
                    "Session {token}: extracting {} ({}, {} bytes)",
                    document.original_name,
                    document.declared_format.label(),
                    document.raw_bytes.len()
                );
                self.session.format = Some(document.declared_format);
                self.session.state = PipelineState::Extracting;
                self.spawn_extraction(token, document);
            }
            Err(err) => self.fail(err),
        }

        self.publish();
        token
    }

    fn start_optimize(&mut self) -> Result<SessionToken, OrchestratorError> {
        let subject = match (&self.session.state, &self.session.text) {
            (PipelineState::Extracted, Some(SessionText::Extracted(extracted))) => {
                extracted.text.clone()
            }
            (state, _) if state.is_busy() => {
                return Err(OrchestratorError::Rejected(BUSY_MESSAGE.to_string()))
            }
            _ => {
                return Err(OrchestratorError::Rejected(
                    NOTHING_TO_OPTIMIZE_MESSAGE.to_string(),
                ))
            }
        };

        let token = self.session.token;
        info!("Session {token}: rewriting {} characters", subject.chars().count());
        self.session.state = PipelineState::Rewriting;
        self.session.notification = Some(Notification::info(REWRITING_MESSAGE));
        self.spawn_rewrite(token, subject);
        self.publish();
        Ok(token)
    }

    fn handle_event(&mut self, event: StageEvent) {
        if event.token() != self.session.token || event.expected_state() != self.session.state
        {
            debug!(
                "Discarding stale {} result from session {} (current session {} is {:?})",
                event.stage_name(),
                event.token(),
                self.session.token,
                self.session.state
            );
            return;
        }

        let token = self.session.token;
        match event {
            StageEvent::Extracted { result, .. } => match result {
                Ok(text) => {
                    let source_format = self.session.format.unwrap_or(Format::Pdf);
                    info!("Session {token}: extracted {} characters", text.chars().count());
                    self.session.text = Some(SessionText::Extracted(ExtractedText {
                        text,
                        source_name: self.session.file_name.clone().unwrap_or_default(),
                        source_format,
                    }));
                    self.session.state = PipelineState::Extracted;
                    self.session.notification = Some(Notification::success(format!(
                        "{} processado com sucesso!",
                        match source_format {
                            Format::Pdf => "PDF",
                            Format::Word => "Documento Word",
                        }
                    )));
                }
                Err(err) => self.fail(err),
            },
            StageEvent::Rewritten { result, .. } => match result {
                Ok(rewritten) => {
                    info!("Session {token}: rewrite received, exporting");
                    self.session.state = PipelineState::Exporting;
                    self.session.notification = Some(Notification::info(EXPORTING_MESSAGE));
                    self.spawn_export(token, rewritten);
                }
                Err(err) => self.fail(err),
            },
            StageEvent::Exported {
                rewritten, result, ..
            } => match result {
                Ok(artifact) => {
                    debug!("Session {token}: saving {}", artifact.suggested_file_name);
                    self.spawn_save(token, rewritten, artifact);
                }
                Err(err) => self.fail(err),
            },
            StageEvent::Saved {
                rewritten, result, ..
            } => match result {
                Ok(path) => {
                    info!("Session {token}: done, saved to {}", path.display());
                    self.session.text = Some(SessionText::Rewritten(rewritten));
                    self.session.saved_to = Some(path);
                    self.session.state = PipelineState::Done;
                    self.session.notification = Some(Notification::success(DONE_MESSAGE));
                }
                Err(err) => self.fail(err),
            },
        }

        self.publish();
    }

    /// Moves the session to `Error`. Nothing partial is kept: the user starts
    /// over with a new upload.
    fn fail(&mut self, err: PipelineError) {
        warn!(
            "Session {} failed while {:?}: {err}",
            self.session.token, self.session.state
        );
        self.session.state = PipelineState::Error;
        self.session.text = None;
        self.session.saved_to = None;
        self.session.notification = Some(Notification::error(err.user_message()));
    }

    fn spawn_extraction(&self, token: SessionToken, document: UploadedDocument) {
        let extractor = Arc::clone(&self.stages.extractor);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                extractor.extract(&document.raw_bytes, document.declared_format)
            })
            .await
            .unwrap_or_else(|e| {
                Err(PipelineError::DecodeFailure(format!(
                    "extraction task failed: {e}"
                )))
            });
            let _ = events.send(StageEvent::Extracted { token, result });
        });
    }

    fn spawn_rewrite(&self, token: SessionToken, subject: String) {
        let rewriter = Arc::clone(&self.stages.rewriter);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = rewriter.rewrite(&subject).await;
            let _ = events.send(StageEvent::Rewritten { token, result });
        });
    }

    fn spawn_export(&self, token: SessionToken, rewritten: RewrittenText) {
        let exporter = Arc::clone(&self.stages.exporter);
        let file_name = self.session.file_name.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let text = rewritten.text.clone();
            let result = tokio::task::spawn_blocking(move || {
                exporter.export(&text, file_name.as_deref())
            })
            .await
            .unwrap_or_else(|e| {
                Err(PipelineError::RenderFailure(format!(
                    "export task failed: {e}"
                )))
            });
            let _ = events.send(StageEvent::Exported {
                token,
                rewritten,
                result,
            });
        });
    }

    fn spawn_save(&self, token: SessionToken, rewritten: RewrittenText, artifact: ExportedArtifact) {
        let sink = Arc::clone(&self.stages.sink);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || sink.save(&artifact))
                .await
                .unwrap_or_else(|e| {
                    Err(PipelineError::RenderFailure(format!("save task failed: {e}")))
                });
            let _ = events.send(StageEvent::Saved {
                token,
                rewritten,
                result,
            });
        });
    }
}
