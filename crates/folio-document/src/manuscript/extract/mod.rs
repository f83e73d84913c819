// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format-specific extractors. Each one turns a source file into an ordered
// list of raw text segments; the block splitter runs over every segment and
// a segment boundary behaves like a blank line.

pub mod archive;
pub mod doc;
pub mod docx;
pub mod epub;
pub mod html;
pub mod pdf;
pub mod rtf;
pub mod text;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use folio_core::error::{FolioError, Result};
use zip::ZipArchive;

pub use archive::ArchiveExtractor;
pub use doc::DocExtractor;
pub use docx::DocxExtractor;
pub use epub::EpubExtractor;
pub use html::HtmlExtractor;
pub use pdf::PdfExtractor;
pub use rtf::RtfExtractor;
pub use text::TextExtractor;

/// Converts one source file into raw text segments.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>>;
}

/// True when no segment holds anything but whitespace, i.e. splitting would
/// produce no blocks at all.
pub(crate) fn is_blank(segments: &[String]) -> bool {
    segments.iter().all(|segment| segment.trim().is_empty())
}

/// Open a ZIP-based container, mapping failures to `ExtractionFailed`.
pub(crate) fn open_zip(path: &Path, label: &str) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|err| text::unreadable(path, &err))?;
    ZipArchive::new(BufReader::new(file)).map_err(|err| {
        FolioError::ExtractionFailed(format!(
            "failed to open {label} {}: {err}",
            path.display()
        ))
    })
}

/// Read one named entry from an open archive.
pub(crate) fn read_zip_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>> {
    let mut entry = archive.by_name(name).map_err(|err| {
        FolioError::ExtractionFailed(format!("cannot read archive entry {name}: {err}"))
    })?;
    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer).map_err(|err| {
        FolioError::ExtractionFailed(format!("cannot read archive entry {name}: {err}"))
    })?;
    Ok(buffer)
}
