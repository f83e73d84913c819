// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manuscript parsing: extractor dispatch by extension, block splitting and
// heading classification, assembled into a `Manuscript`.

pub mod classify;
pub mod extract;
pub mod split;

use std::path::Path;

use tracing::{debug, info, instrument};

use folio_core::config::ConverterConfig;
use folio_core::error::{FolioError, Result};
use folio_core::types::{Manuscript, SourceFormat};

use crate::convert::{DocumentConverter, SofficeConverter};
use extract::{
    ArchiveExtractor, DocExtractor, DocxExtractor, EpubExtractor, Extractor, HtmlExtractor,
    PdfExtractor, RtfExtractor, TextExtractor,
};

pub use classify::is_chapter_heading;
pub use split::split_into_blocks;

/// Builds a `Manuscript` from a single source file.
///
/// The parser holds no per-call state; one instance may parse any number of
/// files. The only injected capability is the legacy `.doc` converter.
pub struct ManuscriptParser {
    converter: Option<Box<dyn DocumentConverter>>,
}

impl ManuscriptParser {
    /// Parser with an explicit converter, or none at all.
    pub fn new(converter: Option<Box<dyn DocumentConverter>>) -> Self {
        Self { converter }
    }

    /// Parser wired to LibreOffice when the configured program is installed.
    pub fn with_config(config: &ConverterConfig) -> Self {
        let converter = SofficeConverter::from_config(config)
            .map(|c| Box::new(c) as Box<dyn DocumentConverter>);
        if converter.is_none() {
            debug!(program = %config.program, "No document converter found; .doc parsing disabled");
        }
        Self::new(converter)
    }

    /// The extractor for `format`, or the error that format is reported as.
    pub fn extractor(&self, format: SourceFormat) -> Result<Box<dyn Extractor + '_>> {
        Ok(match format {
            SourceFormat::Docx => Box::new(DocxExtractor),
            SourceFormat::Doc => Box::new(DocExtractor::new(self.converter.as_deref())),
            SourceFormat::Text => Box::new(TextExtractor),
            SourceFormat::Html => Box::new(HtmlExtractor),
            SourceFormat::Archive => Box::new(ArchiveExtractor),
            SourceFormat::Rtf => Box::new(RtfExtractor),
            SourceFormat::Pdf => Box::new(PdfExtractor),
            SourceFormat::Epub => Box::new(EpubExtractor),
            SourceFormat::Mobi => {
                return Err(FolioError::DeprecatedFormat(
                    "MOBI is deprecated for many KDP workflows. As of March 2025, KDP no longer \
                     supports MOBI for fixed-layout content. Upload DOCX/EPUB/KPF or another \
                     accepted source file."
                        .into(),
                ));
            }
            SourceFormat::Kpf => {
                return Err(FolioError::PassThroughFormat(
                    "KPF is KDP-ready and is handled as a direct pass-through package.".into(),
                ));
            }
        })
    }

    /// Parse `path` into a manuscript titled `title` by `author`.
    ///
    /// All-or-nothing: any extractor failure aborts the parse, and a source
    /// that yields no blocks is `EmptyManuscript`.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn parse(&self, path: &Path, title: &str, author: &str) -> Result<Manuscript> {
        let format = SourceFormat::from_path(path).ok_or_else(|| {
            FolioError::UnsupportedFormat(
                "Unsupported manuscript type. Use DOC/DOCX/KPF/EPUB/HTML/ZIP/TXT/RTF/PDF/MD sources."
                    .into(),
            )
        })?;

        let segments = self.extractor(format)?.extract(path)?;
        let blocks: Vec<_> = segments
            .iter()
            .flat_map(|segment| split_into_blocks(segment))
            .collect();

        let manuscript = Manuscript::new(title, author, blocks)?;
        info!(
            format = format.label(),
            blocks = manuscript.blocks().len(),
            chapters = manuscript.chapter_count(),
            "Manuscript parsed"
        );
        Ok(manuscript)
    }
}

impl Default for ManuscriptParser {
    fn default() -> Self {
        Self::with_config(&ConverterConfig::default())
    }
}

/// Parse with the default converter configuration.
pub fn parse_manuscript(path: &Path, title: &str, author: &str) -> Result<Manuscript> {
    ManuscriptParser::default().parse(path, title, author)
}
