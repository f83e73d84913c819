// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF sources: the embedded text layer, page by page.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use tracing::{debug, instrument};

use super::Extractor;
use crate::pdf::PdfReader;

/// Extractor for `.pdf` files.
///
/// Layout is lost; only the text layer is used. Pages are separated by a
/// blank line so a page break always ends a chunk.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let reader = PdfReader::open(path)?;
        let text = reader.text();
        debug!(pages = reader.page_count(), chars = text.len(), "PDF text read");

        if text.is_empty() {
            return Err(FolioError::ExtractionFailed(
                "PDF text extraction returned no text. Use DOCX or EPUB for best formatting quality."
                    .into(),
            ));
        }
        Ok(vec![text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::tests::pdf_with_pages;

    #[test]
    fn pages_become_one_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        std::fs::write(&path, pdf_with_pages(&["CHAPTER ONE", "Body text"])).unwrap();

        let segments = PdfExtractor.extract(&path).unwrap();
        assert_eq!(segments.len(), 1);
        let chapter = segments[0].find("CHAPTER ONE").unwrap();
        let body = segments[0].find("Body text").unwrap();
        assert!(chapter < body);
    }

    #[test]
    fn textless_pdf_fails_with_guidance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, pdf_with_pages(&[""])).unwrap();

        match PdfExtractor.extract(&path).unwrap_err() {
            FolioError::ExtractionFailed(msg) => {
                assert!(msg.starts_with("PDF text extraction returned no text."))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
