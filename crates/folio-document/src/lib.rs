// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document: manuscript extraction and structural classification, plus
// cover image validation and auto-correction for KDP ebook production.
//
// Manuscripts flow extension -> extractor -> block splitter -> `Manuscript`.
// Covers flow validator -> (optional) auto-corrector -> validator.

pub mod compliance;
pub mod convert;
pub mod cover;
pub mod image;
pub mod manuscript;
pub mod pdf;

// Re-export the primary entry points so callers can use
// `folio_document::ManuscriptParser` etc.
pub use compliance::{SourceStatus, build_compliance_report, source_status};
pub use convert::{DocumentConverter, SofficeConverter};
pub use cover::{CoverOutcome, CoverValidationResult, auto_correct, process_cover, validate};
pub use self::image::ImageProcessor;
pub use manuscript::{ManuscriptParser, is_chapter_heading, parse_manuscript, split_into_blocks};
pub use pdf::PdfReader;
