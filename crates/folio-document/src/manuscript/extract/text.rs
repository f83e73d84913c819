// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text and Markdown sources, plus the lossy decoding shared by every
// text-like extractor.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use tracing::{debug, instrument};

use super::Extractor;

/// Extractor for `.txt` and `.md` files. The file is read as-is.
pub struct TextExtractor;

impl Extractor for TextExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let text = read_lossy(path)?;
        debug!(chars = text.len(), "Text file read");
        Ok(vec![text])
    }
}

/// Read a file as UTF-8, silently dropping undecodable bytes.
pub fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|err| unreadable(path, &err))?;
    Ok(decode_lossy(&bytes))
}

/// A source file that could not be opened or read.
pub(crate) fn unreadable(path: &Path, err: &std::io::Error) -> FolioError {
    FolioError::ExtractionFailed(format!("cannot open {}: {err}", path.display()))
}

/// Decode bytes as UTF-8, dropping a leading BOM and any invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|&ch| ch != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_dropped() {
        assert_eq!(decode_lossy(b"caf\xE9 au lait"), "caf au lait");
    }

    #[test]
    fn bom_is_stripped() {
        assert_eq!(decode_lossy(b"\xEF\xBB\xBFHello"), "Hello");
    }

    #[test]
    fn reads_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.md");
        std::fs::write(&path, "# Title\n\nBody").unwrap();
        let segments = TextExtractor.extract(&path).unwrap();
        assert_eq!(segments, vec!["# Title\n\nBody".to_string()]);
    }

    #[test]
    fn missing_file_is_an_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        match TextExtractor.extract(&path).unwrap_err() {
            FolioError::ExtractionFailed(msg) => {
                assert!(msg.starts_with("cannot open "));
                assert!(msg.contains("gone.txt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
