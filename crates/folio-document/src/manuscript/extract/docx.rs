// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX sources: the native paragraph list of `word/document.xml`.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::normalize_space;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, instrument};

use super::html::resolve_reference;
use super::{Extractor, open_zip, read_zip_entry};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extractor for `.docx` files.
///
/// Each non-empty body paragraph becomes its own segment, so every paragraph
/// is classified on its own. Table cells are not body paragraphs and are
/// skipped.
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let mut archive = open_zip(path, "DOCX")?;
        let xml = read_zip_entry(&mut archive, DOCUMENT_PART).map_err(|err| {
            FolioError::ExtractionFailed(format!(
                "{} is not a valid DOCX ({DOCUMENT_PART}): {}",
                path.display(),
                err.detail()
            ))
        })?;
        let paragraphs = docx_paragraphs(&String::from_utf8_lossy(&xml))?;
        debug!(paragraphs = paragraphs.len(), "DOCX paragraphs read");
        Ok(paragraphs)
    }
}

/// Pull normalized, non-empty body paragraphs out of a WordprocessingML
/// document part.
pub fn docx_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if table_depth == 0 => {
                    if paragraph_depth == 0 {
                        current.clear();
                    }
                    paragraph_depth += 1;
                }
                b"t" => in_text = paragraph_depth > 0,
                b"tab" if paragraph_depth > 0 => current.push('\t'),
                b"br" | b"cr" if paragraph_depth > 0 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if paragraph_depth > 0 => current.push('\t'),
                b"br" | b"cr" if paragraph_depth > 0 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    current.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    let name = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_reference(&name) {
                        current.push_str(&resolved);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" if table_depth == 0 && paragraph_depth > 0 => {
                    paragraph_depth -= 1;
                    if paragraph_depth == 0 {
                        let text = normalize_space(&current);
                        if !text.is_empty() {
                            paragraphs.push(text);
                        }
                        current.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(FolioError::ExtractionFailed(format!(
                    "malformed DOCX document XML: {err}"
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
