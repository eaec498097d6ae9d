//! Download sinks: where an exported artifact goes once it is ready.

use std::path::PathBuf;

use tracing::info;

use crate::export::ExportedArtifact;
use crate::pipeline::error::PipelineError;

pub trait ArtifactSink: Send + Sync {
    /// Persists the artifact and returns where it ended up.
    fn save(&self, artifact: &ExportedArtifact) -> Result<PathBuf, PipelineError>;
}

/// Writes artifacts into a local directory under their suggested file name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, artifact: &ExportedArtifact) -> Result<PathBuf, PipelineError> {
        let path = self.dir.join(&artifact.suggested_file_name);
        std::fs::write(&path, &artifact.bytes).map_err(|e| {
            PipelineError::RenderFailure(format!("cannot write {}: {e}", path.display()))
        })?;
        info!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ExportedArtifact {
        ExportedArtifact {
            bytes: b"%PDF-1.5 test".to_vec(),
            suggested_file_name: "cv_otimizado_IA.pdf".to_string(),
            page_count: 1,
        }
    }

    #[test]
    fn test_directory_sink_writes_under_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = DirectorySink::new(dir.path()).save(&artifact()).unwrap();
        assert_eq!(path, dir.path().join("cv_otimizado_IA.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5 test");
    }

    #[test]
    fn test_directory_sink_missing_dir_is_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("does/not/exist"));
        let err = sink.save(&artifact()).unwrap_err();
        assert!(matches!(err, PipelineError::RenderFailure(_)));
    }
}
