// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legacy `.doc` sources, read through a DOCX conversion.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use tracing::{debug, instrument};

use super::{DocxExtractor, Extractor};
use crate::convert::DocumentConverter;

/// Extractor for `.doc` files.
///
/// The conversion output lives in a temporary directory that is removed when
/// this call returns, whether or not parsing succeeded.
pub struct DocExtractor<'a> {
    converter: Option<&'a dyn DocumentConverter>,
}

impl<'a> DocExtractor<'a> {
    pub fn new(converter: Option<&'a dyn DocumentConverter>) -> Self {
        Self { converter }
    }
}

impl Extractor for DocExtractor<'_> {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let converter = self.converter.ok_or_else(|| {
            FolioError::ExtractionFailed(
                "DOC is accepted, but this server cannot parse .doc without LibreOffice. \
                 Upload DOCX or install soffice."
                    .into(),
            )
        })?;

        let scratch = tempfile::Builder::new().prefix("doc_convert_").tempdir()?;
        let docx = converter.convert_to_docx(path, scratch.path())?;
        debug!(docx = %docx.display(), "DOC converted");
        DocxExtractor.extract(&docx)
    }
}
