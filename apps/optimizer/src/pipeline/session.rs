//! Session record: the single upload-through-export lifecycle the
//! orchestrator is tracking. A fresh record replaces the old one on every
//! upload; nothing carries over.

use std::path::PathBuf;

use serde::Serialize;

use crate::extraction::{ExtractedText, Format};
use crate::pipeline::rewrite::RewrittenText;

/// Monotonic per-orchestrator session id. Stage results carry the token of
/// the session that started them.
pub type SessionToken = u64;

/// Number of characters shown before the preview is cut with an ellipsis.
pub const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Idle,
    Extracting,
    Extracted,
    Rewriting,
    /// Rewrite succeeded; the PDF is being built and saved.
    Exporting,
    Done,
    Error,
}

impl PipelineState {
    /// A stage is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineState::Extracting | PipelineState::Rewriting | PipelineState::Exporting
        )
    }
}

/// The one document text currently shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionText {
    Extracted(ExtractedText),
    Rewritten(RewrittenText),
}

impl SessionText {
    pub fn text(&self) -> &str {
        match self {
            SessionText::Extracted(extracted) => &extracted.text,
            SessionText::Rewritten(rewritten) => &rewritten.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Short user-facing message raised by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub token: SessionToken,
    pub file_name: Option<String>,
    pub format: Option<Format>,
    pub state: PipelineState,
    pub text: Option<SessionText>,
    pub notification: Option<Notification>,
    /// Where the exported artifact was saved, once `Done`.
    pub saved_to: Option<PathBuf>,
}

impl Session {
    pub fn new(token: SessionToken, file_name: Option<String>) -> Self {
        Self {
            token,
            file_name,
            format: None,
            state: PipelineState::Idle,
            text: None,
            notification: None,
            saved_to: None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            token: self.token,
            state: self.state,
            file_name: self.file_name.clone(),
            displayed: self.text.as_ref().map(|text| DisplayedText {
                kind: match text {
                    SessionText::Extracted(_) => DisplayKind::Original,
                    SessionText::Rewritten(_) => DisplayKind::Optimized,
                },
                text: text.text().to_string(),
            }),
            notification: self.notification.clone(),
            saved_to: self.saved_to.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayKind {
    Original,
    Optimized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedText {
    pub kind: DisplayKind,
    pub text: String,
}

impl DisplayedText {
    /// First [`PREVIEW_CHARS`] characters, with `...` when the text is longer.
    pub fn preview(&self) -> String {
        match self.text.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &self.text[..cut]),
            None => self.text.clone(),
        }
    }
}

/// Read-only view of the session published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub token: SessionToken,
    pub state: PipelineState,
    pub file_name: Option<String>,
    pub displayed: Option<DisplayedText>,
    pub notification: Option<Notification>,
    pub saved_to: Option<PathBuf>,
}

impl SessionSnapshot {
    pub fn displayed_text(&self) -> Option<&str> {
        self.displayed.as_ref().map(|d| d.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displayed(text: &str) -> DisplayedText {
        DisplayedText {
            kind: DisplayKind::Original,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(displayed("Jane Doe").preview(), "Jane Doe");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(displayed(&exact).preview(), exact);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "ç".repeat(PREVIEW_CHARS + 10);
        let preview = displayed(&long).preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_snapshot_reflects_single_current_text() {
        let mut session = Session::new(3, Some("cv.pdf".to_string()));
        session.state = PipelineState::Done;
        session.text = Some(SessionText::Rewritten(RewrittenText {
            text: "REWRITTEN".to_string(),
        }));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.token, 3);
        assert_eq!(snapshot.displayed_text(), Some("REWRITTEN"));
        assert_eq!(snapshot.displayed.unwrap().kind, DisplayKind::Optimized);
    }

    #[test]
    fn test_busy_states() {
        assert!(PipelineState::Extracting.is_busy());
        assert!(PipelineState::Rewriting.is_busy());
        assert!(PipelineState::Exporting.is_busy());
        for state in [
            PipelineState::Idle,
            PipelineState::Extracted,
            PipelineState::Done,
            PipelineState::Error,
        ] {
            assert!(!state.is_busy());
        }
    }
}
