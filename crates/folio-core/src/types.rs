// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Folio manuscript engine.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Structural role of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A chapter heading; starts a new chapter bucket downstream.
    Chapter,
    /// Body text.
    Paragraph,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Paragraph => "paragraph",
        }
    }
}

/// One structural unit of a manuscript.
///
/// The text is always whitespace-normalized: no leading or trailing
/// whitespace and no internal run longer than one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    kind: BlockKind,
    text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            text: normalize_space(text),
        }
    }

    pub fn chapter(text: &str) -> Self {
        Self::new(BlockKind::Chapter, text)
    }

    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_chapter(&self) -> bool {
        self.kind == BlockKind::Chapter
    }
}

/// A parsed manuscript ready for the exporters.
///
/// Built once per request and read-only afterwards. `blocks` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manuscript {
    title: String,
    author: String,
    blocks: Vec<Block>,
}

impl Manuscript {
    /// Assemble a manuscript, trimming title and author.
    ///
    /// Fails with [`FolioError::EmptyManuscript`] when `blocks` is empty.
    pub fn new(title: &str, author: &str, blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(FolioError::EmptyManuscript);
        }
        Ok(Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            blocks,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of chapter headings.
    pub fn chapter_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_chapter()).count()
    }
}

/// Which side of the book a cover image is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverRole {
    #[default]
    Front,
    Back,
}

impl CoverRole {
    /// Parse a caller-supplied role tag. Anything other than `front` or
    /// `back` (after trimming, case-insensitive) falls back to `front`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "back" => Self::Back,
            _ => Self::Front,
        }
    }

    /// Lower-case tag used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for CoverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "Front"),
            Self::Back => write!(f, "Back"),
        }
    }
}

/// Manuscript source formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Office Open XML word-processing document.
    Docx,
    /// Legacy binary Word document (needs an external converter).
    Doc,
    /// Plain text or Markdown.
    Text,
    Html,
    /// ZIP bundle of text-like manuscript files.
    Archive,
    Rtf,
    Pdf,
    Epub,
    /// Retired for fixed-layout KDP workflows.
    Mobi,
    /// Kindle Create package, already KDP-ready.
    Kpf,
}

impl SourceFormat {
    /// Infer the source format from a bare extension (with or without the
    /// leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "txt" | "md" => Some(Self::Text),
            "html" | "htm" => Some(Self::Html),
            "zip" => Some(Self::Archive),
            "rtf" => Some(Self::Rtf),
            "pdf" => Some(Self::Pdf),
            "epub" => Some(Self::Epub),
            "mobi" => Some(Self::Mobi),
            "kpf" => Some(Self::Kpf),
            _ => None,
        }
    }

    /// Infer the source format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Short upper-case label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Docx => "DOCX",
            Self::Doc => "DOC",
            Self::Text => "TXT",
            Self::Html => "HTML",
            Self::Archive => "ZIP",
            Self::Rtf => "RTF",
            Self::Pdf => "PDF",
            Self::Epub => "EPUB",
            Self::Mobi => "MOBI",
            Self::Kpf => "KPF",
        }
    }
}

/// Lower-cased extension of `path` including the leading dot, or an empty
/// string when there is none.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_space_collapses_runs() {
        assert_eq!(normalize_space("  It  was\t a\n night.  "), "It was a night.");
        assert_eq!(normalize_space(" \t \n"), "");
    }

    #[test]
    fn block_text_is_normalized() {
        let block = Block::paragraph("  two   words ");
        assert_eq!(block.text(), "two words");
        assert_eq!(block.kind(), BlockKind::Paragraph);
    }

    #[test]
    fn manuscript_rejects_empty_blocks() {
        let err = Manuscript::new("Title", "Author", Vec::new()).unwrap_err();
        assert!(matches!(err, FolioError::EmptyManuscript));
    }

    #[test]
    fn manuscript_trims_title_and_author() {
        let manuscript =
            Manuscript::new("  Dark Night ", "\tA. Writer ", vec![Block::chapter("One")]).unwrap();
        assert_eq!(manuscript.title(), "Dark Night");
        assert_eq!(manuscript.author(), "A. Writer");
        assert_eq!(manuscript.chapter_count(), 1);
    }

    #[test]
    fn cover_role_defaults_to_front() {
        assert_eq!(CoverRole::parse(" BACK "), CoverRole::Back);
        assert_eq!(CoverRole::parse("spine"), CoverRole::Front);
        assert_eq!(CoverRole::parse(""), CoverRole::Front);
        assert_eq!(CoverRole::Back.to_string(), "Back");
    }

    #[test]
    fn source_format_from_path_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_path(Path::new("book.DOCX")),
            Some(SourceFormat::Docx)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("notes.md")),
            Some(SourceFormat::Text)
        );
        assert_eq!(SourceFormat::from_path(Path::new("cover.png")), None);
        assert_eq!(SourceFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn dotted_extension_lowercases() {
        assert_eq!(dotted_extension(Path::new("a/B.HTM")), ".htm");
        assert_eq!(dotted_extension(Path::new("noext")), "");
    }
}
