// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-oriented cover reports for inclusion in a delivered package.

use folio_core::config::CoverTarget;
use folio_core::types::CoverRole;

use super::validator::CoverValidationResult;

/// One role's section of the cover report.
pub fn render_cover_report(
    role: CoverRole,
    result: &CoverValidationResult,
    auto_corrected: bool,
) -> String {
    let show = |value: Option<u32>| value.map_or_else(|| "?".to_string(), |v| v.to_string());
    let mut lines = vec![
        format!("{role} cover:"),
        format!("- Status: {}", if result.is_valid() { "PASS" } else { "FAIL" }),
        format!("- Format: {}", result.format().unwrap_or("unknown")),
        format!(
            "- Dimensions: {}x{} (W x H)",
            show(result.width()),
            show(result.height())
        ),
        format!("- Color mode: {}", result.color_mode().unwrap_or("unknown")),
        format!(
            "- DPI: {}",
            result
                .dpi()
                .map_or_else(|| "missing".to_string(), |(x, y)| format!("{x:.1}x{y:.1}"))
        ),
        format!(
            "- File size: {}",
            result
                .size_mb()
                .map_or_else(|| "unknown".to_string(), |mb| format!("{mb:.2}MB"))
        ),
        format!("- Auto-corrected: {}", if auto_corrected { "Yes" } else { "No" }),
    ];

    if !result.errors().is_empty() {
        lines.push("- Errors:".into());
        lines.extend(result.errors().iter().map(|f| format!("  * {}", f.message)));
    }
    if !result.warnings().is_empty() {
        lines.push("- Warnings:".into());
        lines.extend(result.warnings().iter().map(|f| format!("  * {}", f.message)));
    }
    lines.join("\n")
}

/// The whole cover report: a header naming the rules followed by each
/// section, separated by blank lines.
pub fn render_cover_validation_report(sections: &[String], target: &CoverTarget) -> String {
    format!(
        "KDP Cover Validation Report\nReference: {}\n\n{}",
        target.help_url,
        sections.join("\n\n")
    )
}
