// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::io::Write;

use folio_core::error::Result;
use folio_document::build_compliance_report;

use crate::cli::ComplianceArgs;

pub fn run(args: &ComplianceArgs, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", build_compliance_report(&args.file, &args.outputs))?;
    Ok(())
}
