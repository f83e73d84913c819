// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ZIP bundles of text-like manuscript files.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::types::SourceFormat;
use tracing::{debug, instrument};

use super::html::html_to_text;
use super::rtf::rtf_to_text;
use super::text::decode_lossy;
use super::{Extractor, is_blank, open_zip, read_zip_entry};

/// Extractor for `.zip` uploads.
///
/// Entries are visited in ascending name order so the result never depends
/// on how the archive was written. Only HTML, TXT, MD and RTF entries
/// contribute; everything else (images, stylesheets, nested archives) is
/// ignored.
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let mut archive = open_zip(path, "ZIP")?;

        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        names.sort();

        let mut segments = Vec::new();
        for name in &names {
            let format = SourceFormat::from_path(Path::new(name));
            let convert: fn(&str) -> String = match format {
                Some(SourceFormat::Html) => html_to_text,
                Some(SourceFormat::Rtf) => rtf_to_text,
                Some(SourceFormat::Text) => str::to_string,
                _ => {
                    debug!(entry = %name, "Skipping non-manuscript entry");
                    continue;
                }
            };
            let raw = decode_lossy(&read_zip_entry(&mut archive, name)?);
            debug!(entry = %name, bytes = raw.len(), "Extracting archive entry");
            segments.push(convert(&raw));
        }

        if is_blank(&segments) {
            return Err(FolioError::ExtractionFailed(
                "ZIP upload must contain at least one HTML, TXT, MD, or RTF manuscript file."
                    .into(),
            ));
        }
        Ok(segments)
    }
}
