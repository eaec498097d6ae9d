//! Upload → extract → rewrite → export pipeline.
//!
//! `orchestrator` owns the session and sequences the stages; `rewrite` is the
//! client for the server's generation endpoint.

pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod rewrite;
pub mod session;

pub use error::PipelineError;
pub use orchestrator::{Orchestrator, OrchestratorError, Stages};
pub use rewrite::{HttpRewriteClient, RewrittenText, Rewriter};
pub use session::{
    DisplayKind, DisplayedText, Notification, NotificationLevel, PipelineState, SessionSnapshot,
    SessionToken,
};
