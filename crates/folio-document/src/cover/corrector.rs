// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover auto-correction: fit the artwork onto a target-sized canvas and
// re-encode it the way the target expects.

use std::path::{Path, PathBuf};

use folio_core::config::CoverTarget;
use folio_core::error::Result;
use folio_core::types::CoverRole;
use tracing::{info, instrument};

use crate::image::ImageProcessor;

/// File name the corrected cover is written under.
pub fn corrected_file_name(role: CoverRole) -> String {
    format!("{}_cover_kdp_ready.jpg", role.as_str())
}

/// Produce a corrected copy of the cover at `path` inside `out_dir`.
///
/// The artwork is converted to RGB, scaled down (never up) to fit the ideal
/// dimensions, centred on a canvas of exactly those dimensions and saved as
/// JPEG declaring the required DPI. Nothing is cropped. The output is not
/// re-validated here.
#[instrument(skip(target), fields(path = %path.display()))]
pub fn auto_correct(
    path: &Path,
    out_dir: &Path,
    role: CoverRole,
    target: &CoverTarget,
) -> Result<PathBuf> {
    let out_path = out_dir.join(corrected_file_name(role));
    let dpi = target.required_dpi.round().clamp(1.0, f64::from(u16::MAX)) as u16;

    ImageProcessor::open(path)?
        .into_rgb()
        .fit_within(target.ideal_width, target.ideal_height)
        .letterbox(target.ideal_width, target.ideal_height, target.canvas_fill)
        .save_jpeg(&out_path, target.jpeg_quality, Some(dpi))?;

    info!(role = role.as_str(), out = %out_path.display(), "Cover auto-corrected");
    Ok(out_path)
}
