// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::io::Write;
use std::path::{Path, PathBuf};

use folio_core::config::FolioConfig;
use folio_core::error::Result;
use folio_core::types::CoverRole;
use folio_document::cover::{CoverOutcome, CoverValidationResult, render_cover_validation_report};
use folio_document::process_cover;
use serde::Serialize;

use crate::cli::CoverArgs;

/// Machine-readable view of a cover outcome.
#[derive(Serialize)]
struct CoverJson<'a> {
    role: CoverRole,
    delivered: &'a Path,
    original: &'a CoverValidationResult,
    corrected: Option<&'a CoverValidationResult>,
}

pub fn run(args: &CoverArgs, config: &FolioConfig, out: &mut impl Write) -> Result<()> {
    let role = CoverRole::parse(&args.role);
    let out_dir = args.out_dir.clone().unwrap_or_else(|| default_out_dir(&args.image));

    let outcome = process_cover(&args.image, &out_dir, role, !args.no_auto_fix, &config.cover)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &json_view(&outcome))?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{}",
            render_cover_validation_report(&[outcome.report()], &config.cover)
        )?;
        writeln!(out)?;
        writeln!(out, "{}", outcome.summary())?;
        writeln!(out, "Cover to upload: {}", outcome.delivered_path().display())?;
    }
    Ok(())
}

fn json_view(outcome: &CoverOutcome) -> CoverJson<'_> {
    CoverJson {
        role: outcome.role,
        delivered: outcome.delivered_path(),
        original: &outcome.original,
        corrected: outcome.corrected.as_ref().map(|c| &c.validation),
    }
}

/// Corrected covers land beside the original unless told otherwise.
fn default_out_dir(image: &Path) -> PathBuf {
    match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
