//! Document export: lays rewritten text out on fixed-size pages, renders it
//! to PDF and hands the artifact to a download sink.

pub mod render;
pub mod sink;

use serde::Serialize;
use tracing::debug;

use crate::layout::{default_page_config, layout_text, FontMetricTable, PageConfig, HELVETICA};
use crate::pipeline::error::PipelineError;

pub use sink::{ArtifactSink, DirectorySink};

/// Appended to the original base name of every exported file.
pub const OPTIMIZED_SUFFIX: &str = "_otimizado_IA";
/// Base name used when the original file name is unknown.
pub const FALLBACK_BASE_NAME: &str = "curriculo";

/// A rendered PDF ready for download. Not retained after saving.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedArtifact {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub suggested_file_name: String,
    pub page_count: usize,
}

/// Seam between the orchestrator and the PDF renderer.
pub trait Exporter: Send + Sync {
    fn export(
        &self,
        text: &str,
        original_name: Option<&str>,
    ) -> Result<ExportedArtifact, PipelineError>;
}

/// Default exporter: Helvetica on A4 with the fixed margins of
/// [`default_page_config`].
pub struct PdfExporter {
    metrics: &'static FontMetricTable,
    config: PageConfig,
}

impl PdfExporter {
    pub fn new(config: PageConfig) -> Self {
        Self {
            metrics: &HELVETICA,
            config,
        }
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(default_page_config())
    }
}

impl Exporter for PdfExporter {
    fn export(
        &self,
        text: &str,
        original_name: Option<&str>,
    ) -> Result<ExportedArtifact, PipelineError> {
        let layout = layout_text(text, self.metrics, &self.config);
        let bytes = render::render_pdf(&layout, self.metrics, &self.config)?;
        let suggested_file_name = suggested_file_name(original_name);
        debug!(
            "Exported {} ({} pages, {} lines, {} bytes)",
            suggested_file_name,
            layout.page_count(),
            layout.line_count(),
            bytes.len()
        );
        Ok(ExportedArtifact {
            bytes,
            suggested_file_name,
            page_count: layout.page_count(),
        })
    }
}

/// `resume.pdf` → `resume_otimizado_IA.pdf`; no name → `curriculo_otimizado_IA.pdf`.
///
/// Only the last extension is stripped, and only when it is non-empty and not
/// part of a directory component.
pub fn suggested_file_name(original_name: Option<&str>) -> String {
    let base = original_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(strip_extension)
        .filter(|base| !base.is_empty())
        .unwrap_or(FALLBACK_BASE_NAME);
    format!("{base}{OPTIMIZED_SUFFIX}.pdf")
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_name_replaces_extension() {
        assert_eq!(suggested_file_name(Some("resume.pdf")), "resume_otimizado_IA.pdf");
        assert_eq!(suggested_file_name(Some("cv.docx")), "cv_otimizado_IA.pdf");
        assert_eq!(
            suggested_file_name(Some("cv.v2.final.doc")),
            "cv.v2.final_otimizado_IA.pdf"
        );
    }

    #[test]
    fn test_suggested_name_without_original() {
        assert_eq!(suggested_file_name(None), "curriculo_otimizado_IA.pdf");
        assert_eq!(suggested_file_name(Some("")), "curriculo_otimizado_IA.pdf");
    }

    #[test]
    fn test_suggested_name_edge_cases() {
        assert_eq!(suggested_file_name(Some("README")), "README_otimizado_IA.pdf");
        assert_eq!(suggested_file_name(Some("trailing.")), "trailing._otimizado_IA.pdf");
        assert_eq!(suggested_file_name(Some(".pdf")), "curriculo_otimizado_IA.pdf");
    }

    #[test]
    fn test_export_is_byte_identical_for_identical_input() {
        let exporter = PdfExporter::default();
        let text = "Maria Silva\nEngenheira de Software\n".repeat(80);
        let first = exporter.export(&text, Some("maria.pdf")).unwrap();
        let second = exporter.export(&text, Some("maria.pdf")).unwrap();
        assert_eq!(first.page_count, second.page_count);
        assert_eq!(first.bytes, second.bytes);
        assert!(first.page_count > 1);
    }

    #[test]
    fn test_export_output_is_a_pdf() {
        let artifact = PdfExporter::default()
            .export("Jane Doe", None)
            .unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(artifact.suggested_file_name, "curriculo_otimizado_IA.pdf");
        assert_eq!(artifact.page_count, 1);
    }
}
