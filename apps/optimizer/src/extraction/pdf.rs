//! PDF text extraction via `pdf-extract`.
//!
//! Pages are visited one at a time in source order. Each page contributes a
//! single segment (its text runs joined by spaces) terminated by a newline.
//! Simple fonts and composite (Type0, `Identity-H`) fonts are both decoded,
//! the latter through their `ToUnicode` CMap. No attempt is made to rebuild
//! columns, tables or reading order.

use tracing::{debug, warn};

use crate::pipeline::error::PipelineError;

pub fn extract_pdf_text(raw_bytes: &[u8]) -> Result<String, PipelineError> {
    // pdf_extract can panic on malformed input instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(raw_bytes))
        .map_err(|_| {
            warn!("PDF extraction panicked (malformed PDF)");
            PipelineError::DecodeFailure("malformed PDF".to_string())
        })?
        .map_err(|e| PipelineError::DecodeFailure(format!("cannot parse PDF: {e:?}")))?;

    if pages.is_empty() {
        return Err(PipelineError::DecodeFailure("PDF has no pages".to_string()));
    }
    debug!("PDF loaded with {} pages", pages.len());

    let mut full_text = String::new();
    for (index, raw) in pages.iter().enumerate() {
        let page_text = join_runs(raw);
        debug!(
            "Page {} processed, {} characters extracted",
            index + 1,
            page_text.chars().count()
        );
        full_text.push_str(&page_text);
        full_text.push('\n');
    }

    Ok(full_text)
}

/// Collapses the text runs of a page (separated by arbitrary whitespace and
/// line breaks) into one space-joined segment.
fn join_runs(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pdf_with_identity_h_text, pdf_with_pages};

    fn page_labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Page {i} of {n}")).collect()
    }

    fn assert_page_segments(n: usize) {
        let labels = page_labels(n);
        let bytes = pdf_with_pages(&labels);
        let text = extract_pdf_text(&bytes).unwrap();
        let segments: Vec<&str> = text.lines().collect();
        assert_eq!(segments.len(), n, "expected {n} segments, got {text:?}");
        for (segment, label) in segments.iter().zip(&labels) {
            assert_eq!(segment, label);
        }
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_single_page_pdf_yields_one_segment() {
        assert_page_segments(1);
    }

    #[test]
    fn test_five_page_pdf_preserves_page_order() {
        assert_page_segments(5);
    }

    #[test]
    fn test_fifty_page_pdf_preserves_page_order() {
        assert_page_segments(50);
    }

    #[test]
    fn test_identity_h_font_is_decoded_through_to_unicode() {
        let bytes = pdf_with_identity_h_text("Jane");
        let text = extract_pdf_text(&bytes).unwrap();
        assert_eq!(text, "Jane\n");
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_failure() {
        let err = extract_pdf_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PipelineError::DecodeFailure(_)));
    }

    #[test]
    fn test_join_runs_collapses_line_breaks() {
        assert_eq!(join_runs("Jane  Doe\nEngineer\n\n"), "Jane Doe Engineer");
        assert_eq!(join_runs("   "), "");
    }
}
