//! Word text extraction: reads `word/document.xml` out of the OOXML package
//! and keeps only the run text. Paragraphs end with a newline, `w:tab` becomes
//! a tab and `w:br`/`w:cr` a line break.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use crate::pipeline::error::PipelineError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_word_text(raw_bytes: &[u8]) -> Result<String, PipelineError> {
    let mut archive = ZipArchive::new(Cursor::new(raw_bytes))
        .map_err(|e| PipelineError::DecodeFailure(format!("not a Word package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| PipelineError::DecodeFailure(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| PipelineError::DecodeFailure(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    let text = document_xml_to_text(&xml)?;
    debug!("Word document processed, {} characters extracted", text.chars().count());
    Ok(text)
}

fn document_xml_to_text(xml: &str) -> Result<String, PipelineError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut text = String::new();
    // Tab stops in paragraph properties are also `w:tab`; only runs count.
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"r" => run_depth += 1,
                b"t" if run_depth > 0 => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if run_depth > 0 => text.push('\t'),
                b"br" | b"cr" if run_depth > 0 => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let chunk = e
                    .unescape()
                    .map_err(|e| PipelineError::DecodeFailure(format!("bad text run: {e}")))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PipelineError::DecodeFailure(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
