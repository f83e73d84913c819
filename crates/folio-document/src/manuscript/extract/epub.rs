// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// EPUB sources: container.xml -> OPF package -> XHTML content documents.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, instrument, warn};

use super::html::{body_content, html_to_text};
use super::text::decode_lossy;
use super::{Extractor, is_blank, open_zip, read_zip_entry};

const CONTAINER_PATH: &str = "META-INF/container.xml";
const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Extractor for `.epub` files.
///
/// Content documents are read in manifest order. The EPUB 3 navigation
/// document is a table of contents, not manuscript text, and is skipped.
pub struct EpubExtractor;

impl Extractor for EpubExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let mut archive = open_zip(path, "EPUB")?;

        let container = read_zip_entry(&mut archive, CONTAINER_PATH)?;
        let opf_path = rootfile_path(&decode_lossy(&container))?;
        let opf = read_zip_entry(&mut archive, &opf_path)?;
        let documents = content_documents(&decode_lossy(&opf))?;
        debug!(opf = %opf_path, documents = documents.len(), "EPUB package read");

        let base = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let mut segments = Vec::with_capacity(documents.len());
        for href in &documents {
            let entry = resolve_href(base, href);
            match read_zip_entry(&mut archive, &entry) {
                Ok(bytes) => {
                    let markup = decode_lossy(&bytes);
                    segments.push(html_to_text(body_content(&markup)));
                }
                // A dangling manifest entry loses one document, not the book.
                Err(err) => warn!(entry = %entry, %err, "Skipping unreadable EPUB document"),
            }
        }

        if is_blank(&segments) {
            return Err(FolioError::ExtractionFailed(
                "Could not extract readable content from EPUB.".into(),
            ));
        }
        Ok(segments)
    }
}

/// Package document path named by the first `<rootfile>` in container.xml.
fn rootfile_path(container: &str) -> Result<String> {
    let mut reader = Reader::from_str(container);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path") {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(FolioError::ExtractionFailed(format!(
                    "malformed EPUB container.xml: {err}"
                )));
            }
            _ => {}
        }
    }

    Err(FolioError::ExtractionFailed(
        "EPUB container.xml names no package document".into(),
    ))
}

/// Hrefs of the XHTML content documents in manifest order.
fn content_documents(opf: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(opf);
    reader.config_mut().trim_text(true);

    let mut hrefs = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"item" => {
                let media_type = attribute(&e, b"media-type").unwrap_or_default();
                let is_nav = attribute(&e, b"properties")
                    .is_some_and(|props| props.split_whitespace().any(|p| p == "nav"));
                if media_type == XHTML_MEDIA_TYPE && !is_nav {
                    if let Some(href) = attribute(&e, b"href") {
                        hrefs.push(href);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(FolioError::ExtractionFailed(format!(
                    "malformed EPUB package document: {err}"
                )));
            }
            _ => {}
        }
    }
    Ok(hrefs)
}

/// Unescaped value of the attribute with the given local name.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value);
            super::html::unescape_entities(&raw)
        })
}

/// Resolve a manifest href against the package directory, dropping any
/// fragment and collapsing `.` / `..` segments.
fn resolve_href(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or_default();
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
