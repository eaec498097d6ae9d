//! Renders a `PageLayout` into PDF bytes with `lopdf`.
//!
//! Text is set in the base-14 Helvetica font with WinAnsiEncoding, so the
//! output embeds no font program and is byte-for-byte reproducible: no
//! timestamps or random identifiers are written.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};

use crate::layout::{FontMetricTable, PageConfig, PageLayout};
use crate::pipeline::error::PipelineError;

const FONT_RESOURCE: &str = "F1";

pub fn render_pdf(
    layout: &PageLayout,
    metrics: &FontMetricTable,
    config: &PageConfig,
) -> Result<Vec<u8>, PipelineError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => metrics.base_font,
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_RESOURCE => font_id },
    });

    let mut kids = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        // One text object per line: extractors see each line as its own run.
        let mut operations = Vec::with_capacity(page.lines.len() * 5);
        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            // PDF user space has its origin at the bottom-left corner.
            let y = config.page_height_pt - line.baseline_pt;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![FONT_RESOURCE.into(), config.font_size_pt.into()],
            ));
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    config.margin_pt.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&line.text),
                    StringFormat::Literal,
                )],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| PipelineError::RenderFailure(format!("content stream: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                config.page_width_pt.into(),
                config.page_height_pt.into(),
            ],
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PipelineError::RenderFailure(format!("serialise PDF: {e}")))?;
    Ok(bytes)
}

/// Encodes text for a WinAnsiEncoding simple font. Latin-1 maps 1:1; the
/// typographic punctuation WinAnsi places in 0x80..0x9F is translated; any
/// other character becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
