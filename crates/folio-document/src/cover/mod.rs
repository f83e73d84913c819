// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover compliance: validation, auto-correction and the policy that ties
// them together for one uploaded cover.

pub mod corrector;
pub mod report;
pub mod validator;

use std::path::{Path, PathBuf};

use folio_core::config::CoverTarget;
use folio_core::error::{FolioError, Result};
use folio_core::types::CoverRole;
use tracing::{info, instrument, warn};

pub use corrector::auto_correct;
pub use report::{render_cover_report, render_cover_validation_report};
pub use validator::{CoverCheck, CoverFinding, CoverValidationResult, validate};

/// A cover that was replaced by its auto-corrected copy.
#[derive(Debug, Clone)]
pub struct CorrectedCover {
    pub path: PathBuf,
    pub validation: CoverValidationResult,
}

/// Result of running the cover policy on one image.
///
/// Either the original already complied (`corrected` is `None`) or it did
/// not and a corrected copy that passes re-validation replaces it.
#[derive(Debug, Clone)]
pub struct CoverOutcome {
    pub role: CoverRole,
    pub source: PathBuf,
    pub original: CoverValidationResult,
    pub corrected: Option<CorrectedCover>,
}

impl CoverOutcome {
    /// The image to deliver: the corrected copy if there is one.
    pub fn delivered_path(&self) -> &Path {
        self.corrected
            .as_ref()
            .map_or(self.source.as_path(), |c| c.path.as_path())
    }

    pub fn was_corrected(&self) -> bool {
        self.corrected.is_some()
    }

    /// Report section for this cover, including the corrected output when
    /// correction ran.
    pub fn report(&self) -> String {
        let original = render_cover_report(self.role, &self.original, false);
        match &self.corrected {
            None => original,
            Some(corrected) => format!(
                "{original}\n\n{} cover auto-corrected output:\n{}",
                self.role,
                render_cover_report(self.role, &corrected.validation, true)
            ),
        }
    }

    /// One sentence describing what the author will get.
    pub fn summary(&self) -> String {
        if self.was_corrected() {
            format!(
                "{} cover did not meet KDP rules. The auto-corrected image will be used.",
                self.role
            )
        } else {
            format!("{} cover already meets KDP rules. The original image will be used.", self.role)
        }
    }
}

/// Validate the cover at `path` and, when it fails and `auto_fix` is set,
/// correct it into `out_dir` and validate the result.
///
/// Failures are distinct: an undecodable image, a non-compliant image with
/// auto-fix off, and a correction that still fails validation.
#[instrument(skip(target), fields(path = %path.display()))]
pub fn process_cover(
    path: &Path,
    out_dir: &Path,
    role: CoverRole,
    auto_fix: bool,
    target: &CoverTarget,
) -> Result<CoverOutcome> {
    let original = validate(path, role, target);

    if let Some(detail) = original.unreadable_detail() {
        return Err(FolioError::ImageUnreadable {
            role,
            detail: detail.to_string(),
        });
    }

    if original.is_valid() {
        return Ok(CoverOutcome {
            role,
            source: path.to_path_buf(),
            original,
            corrected: None,
        });
    }

    if !auto_fix {
        return Err(FolioError::ImageNonCompliant {
            role,
            violations: original.error_messages(),
        });
    }

    let corrected_path = auto_correct(path, out_dir, role, target)?;
    let corrected = validate(&corrected_path, role, target);
    if !corrected.is_valid() {
        warn!(role = role.as_str(), "Auto-corrected cover still fails validation");
        return Err(FolioError::AutoCorrectionFailed {
            role,
            before: original.error_messages(),
            after: corrected.error_messages(),
        });
    }

    info!(role = role.as_str(), "Cover replaced by auto-corrected copy");
    Ok(CoverOutcome {
        role,
        source: path.to_path_buf(),
        original,
        corrected: Some(CorrectedCover {
            path: corrected_path,
            validation: corrected,
        }),
    })
}
