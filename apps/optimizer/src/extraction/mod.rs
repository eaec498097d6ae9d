//! Text extraction: turns an uploaded PDF or Word document into plain text.
//!
//! The format is resolved once, from the file name, when the upload arrives.
//! Decoding itself is delegated to `pdf-extract` (PDF) and `zip` + `quick-xml`
//! (WordprocessingML).

pub mod pdf;
pub mod word;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::error::PipelineError;

/// File extensions accepted by the upload surfaces.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Declared document format, resolved from the uploaded file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Pdf,
    /// `.doc` and `.docx` share one decoder.
    Word,
}

impl Format {
    /// Picks the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Format::Pdf),
            "doc" | "docx" => Some(Format::Word),
            _ => None,
        }
    }

    /// Sniffs the format from a file name. Fails before any bytes are touched.
    pub fn from_file_name(name: &str) -> Result<Format, PipelineError> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
            .ok_or_else(|| PipelineError::UnsupportedFormat(name.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Pdf => "PDF",
            Format::Word => "Word",
        }
    }
}

/// A file as received from the user. Dropped once extraction finishes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub raw_bytes: Vec<u8>,
    pub declared_format: Format,
    pub original_name: String,
}

impl UploadedDocument {
    pub fn new(original_name: impl Into<String>, raw_bytes: Vec<u8>) -> Result<Self, PipelineError> {
        let original_name = original_name.into();
        let declared_format = Format::from_file_name(&original_name)?;
        Ok(Self {
            raw_bytes,
            declared_format,
            original_name,
        })
    }
}

/// Plain text pulled from an [`UploadedDocument`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub source_name: String,
    pub source_format: Format,
}

/// Seam between the orchestrator and the format decoders.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, raw_bytes: &[u8], format: Format) -> Result<String, PipelineError>;
}

/// Default extractor backed by the `pdf` and `word` decoders.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, raw_bytes: &[u8], format: Format) -> Result<String, PipelineError> {
        extract(raw_bytes, format)
    }
}

/// Dispatches to the decoder for `format`.
pub fn extract(raw_bytes: &[u8], format: Format) -> Result<String, PipelineError> {
    match format {
        Format::Pdf => pdf::extract_pdf_text(raw_bytes),
        Format::Word => word::extract_word_text(raw_bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_resolve() {
        assert_eq!(Format::from_file_name("cv.pdf").unwrap(), Format::Pdf);
        assert_eq!(Format::from_file_name("cv.PDF").unwrap(), Format::Pdf);
        assert_eq!(Format::from_file_name("cv.doc").unwrap(), Format::Word);
        assert_eq!(Format::from_file_name("cv.final.docx").unwrap(), Format::Word);
    }

    #[test]
    fn test_every_accepted_extension_resolves() {
        for ext in ACCEPTED_EXTENSIONS {
            assert!(Format::from_extension(ext).is_some(), "{ext} should be accepted");
        }
    }

    #[test]
    fn test_unsupported_extensions_rejected() {
        for name in ["cv.txt", "cv.odt", "cv", "pdf", "cv.pdf.zip"] {
            assert!(
                matches!(
                    Format::from_file_name(name),
                    Err(PipelineError::UnsupportedFormat(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_uploaded_document_rejects_before_decoding() {
        // Garbage bytes never reach a decoder when the extension is wrong.
        let err = UploadedDocument::new("photo.png", vec![0xFF; 16]).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }
}
