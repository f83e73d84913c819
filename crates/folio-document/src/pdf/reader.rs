// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open existing PDF documents and pull their text page by page
// using the `lopdf` crate.

use std::path::Path;

use folio_core::error::FolioError;
use lopdf::Document;
use tracing::{debug, info, instrument, warn};

/// Reads text out of existing PDF files.
///
/// Wraps `lopdf::Document`. Text comes from the content streams as written;
/// scanned pages without a text layer yield nothing.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Where the document came from; `None` for in-memory input.
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path_ref = path.as_ref();
        info!(path = %path_ref.display(), "Opening manuscript PDF");

        let document = Document::load(path_ref).map_err(|err| {
            FolioError::ExtractionFailed(format!(
                "failed to open PDF {}: {}",
                path_ref.display(),
                err
            ))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let document = Document::load_mem(data).map_err(|err| {
            FolioError::ExtractionFailed(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Path given to [`PdfReader::open`], if any.
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Text -----------------------------------------------------------------

    /// Text of every page in page order.
    ///
    /// A page whose content cannot be decoded contributes an empty string
    /// rather than failing the whole document.
    #[instrument(skip(self))]
    pub fn page_texts(&self) -> Vec<String> {
        // lopdf pages are keyed by 1-indexed page number, already sorted.
        self.document
            .get_pages()
            .keys()
            .map(|&page_number| match self.document.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(err) => {
                    warn!(page_number, %err, "Page text extraction failed, using empty text");
                    String::new()
                }
            })
            .collect()
    }

    /// All page texts joined with blank lines and trimmed.
    pub fn text(&self) -> String {
        self.page_texts().join("\n\n").trim().to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a PDF with one page per entry, each showing the given text in
    /// Helvetica. An empty string produces a page with no text operators.
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn reads_text_from_each_page() {
        let reader = PdfReader::from_bytes(&pdf_with_pages(&["Chapter One", "Hello world"])).unwrap();
        assert_eq!(reader.page_count(), 2);
        assert!(reader.source_path().is_none());

        let pages = reader.page_texts();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Chapter One"));
        assert!(pages[1].contains("Hello world"));
    }

    #[test]
    fn textless_pages_give_empty_text() {
        let reader = PdfReader::from_bytes(&pdf_with_pages(&["", ""])).unwrap();
        assert_eq!(reader.text(), "");
    }

    #[test]
    fn garbage_is_an_extraction_failure() {
        let err = PdfReader::from_bytes(b"definitely not a pdf").err().unwrap();
        assert!(matches!(err, FolioError::ExtractionFailed(_)));
    }
}
