//! Text extraction from uploaded resumes.
//!
//! `.pdf` goes through pdf-extract (pages concatenated in order), `.docx` is
//! read straight from its zip container, anything else must be UTF-8 text.
//! Every failure collapses to `None`; the caller offers manual entry instead.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::intake::UploadedFile;

const DOCX_BODY_PART: &str = "word/document.xml";
/// Ceiling on the inflated body XML; the upload cap only bounds the compressed archive.
const MAX_DOCX_XML_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Sniffs the kind from the file name's extension (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }
}

/// Returns the document's text, or `None` when it cannot be read or is blank.
pub fn extract_text(file: &UploadedFile) -> Option<String> {
    let kind = DocumentKind::from_name(&file.name);
    let result = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&file.content)
            .map_err(|e| format!("PDF extraction error: {e}")),
        DocumentKind::Docx => docx_text(&file.content, MAX_DOCX_XML_BYTES),
        DocumentKind::PlainText => String::from_utf8(file.content.to_vec())
            .map_err(|e| format!("not valid UTF-8: {e}")),
    };

    match result {
        Ok(text) if !text.trim().is_empty() => {
            debug!("Extracted {} chars from {:?} upload", text.len(), kind);
            Some(text)
        }
        Ok(_) => {
            warn!("Upload '{}' contained no text", file.name);
            None
        }
        Err(e) => {
            warn!("Could not extract text from '{}': {e}", file.name);
            None
        }
    }
}

/// Concatenates paragraph text from a DOCX body, one paragraph per line.
fn docx_text(bytes: &[u8], limit: u64) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a DOCX archive: {e}"))?;
    let entry = archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| format!("missing {DOCX_BODY_PART}: {e}"))?;
    if entry.size() > limit {
        return Err(format!(
            "{DOCX_BODY_PART} inflates to {} bytes (limit {limit})",
            entry.size()
        ));
    }

    // The declared size is not trusted; read one byte past the limit to detect overruns.
    let mut xml = String::new();
    entry
        .take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable {DOCX_BODY_PART}: {e}"))?;
    if xml.len() as u64 > limit {
        return Err(format!("{DOCX_BODY_PART} exceeds {limit} bytes"));
    }
    paragraphs_from_document_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// One open `w:p`. Text boxes nest whole paragraphs inside a run of the
/// enclosing one, so each level keeps its own text and run depth.
#[derive(Default)]
struct OpenParagraph {
    text: String,
    run_depth: usize,
}

impl OpenParagraph {
    fn in_run(&self) -> bool {
        self.run_depth > 0
    }
}

/// Paragraphs are emitted as they close, so a nested paragraph precedes the
/// one that contains it.
fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => open.push(OpenParagraph::default()),
                b"w:r" => {
                    if let Some(p) = open.last_mut() {
                        p.run_depth += 1;
                    }
                }
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(p)) if p.in_run() => p.text.push('\t'),
                (b"w:br" | b"w:cr", Some(p)) if p.in_run() => p.text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                if let Some(p) = open.last_mut() {
                    let text = t.unescape().map_err(|e| format!("bad text run: {e}"))?;
                    p.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:r" => {
                    if let Some(p) = open.last_mut() {
                        p.run_depth = p.run_depth.saturating_sub(1);
                    }
                }
                b"w:p" => {
                    if let Some(p) = open.pop() {
                        paragraphs.push(p.text);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed document XML at {}: {e}",
                    reader.buffer_position()
                ))
            }
        }
    }

    Ok(paragraphs)
}
