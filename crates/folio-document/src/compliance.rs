// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// KDP source-format compliance report.

use std::path::Path;

use folio_core::types::dotted_extension;
use serde::Serialize;

pub const KDP_TOPIC_URL: &str = "https://kdp.amazon.com/en_US/help/topic/G200634390";
pub const RECOMMENDED_EXTENSIONS: &[&str] = &[".doc", ".docx", ".kpf", ".epub"];
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".html", ".htm", ".zip", ".txt", ".rtf", ".pdf"];
pub const MOBI_DEPRECATION_NOTICE: &str =
    "As of March 2025, KDP no longer supports MOBI for fixed-layout content.";

/// How KDP treats a manuscript source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Recommended,
    Accepted,
    Deprecated,
    Unlisted,
}

impl SourceStatus {
    /// The status line shown in the compliance report.
    pub fn report_line(self) -> &'static str {
        match self {
            Self::Recommended => "Source format status: PASS (recommended by KDP)",
            Self::Accepted => {
                "Source format status: PASS (accepted by KDP, but not in recommended list)"
            }
            Self::Deprecated => {
                "Source format status: FAIL (MOBI deprecation for fixed-layout workflows)"
            }
            Self::Unlisted => {
                "Source format status: WARN (not listed in KDP accepted/recommended source formats)"
            }
        }
    }
}

/// Classify `path` by its lower-cased extension.
///
/// `.md` parses fine but is not on KDP's list, so it is `Unlisted`.
pub fn source_status(path: &Path) -> SourceStatus {
    let ext = dotted_extension(path);
    if RECOMMENDED_EXTENSIONS.contains(&ext.as_str()) {
        SourceStatus::Recommended
    } else if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        SourceStatus::Accepted
    } else if ext == ".mobi" {
        SourceStatus::Deprecated
    } else {
        SourceStatus::Unlisted
    }
}

/// Render the submission compliance report for `source`, listing `outputs`
/// (caller-supplied labels such as `"Kindle EPUB (EPUB)"`) as the generated
/// package contents. Always ends with a newline.
pub fn build_compliance_report(source: &Path, outputs: &[String]) -> String {
    let ext = dotted_extension(source);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut lines: Vec<String> = vec![
        "KDP Submission Compliance Report".into(),
        format!("Reference: {KDP_TOPIC_URL}"),
        String::new(),
        format!("Source file: {name}"),
        format!(
            "Source extension: {}",
            if ext.is_empty() { "(none)" } else { ext.as_str() }
        ),
        String::new(),
        source_status(source).report_line().into(),
        String::new(),
        "KDP recommended source formats: DOC, DOCX, KPF, EPUB".into(),
        "KDP accepted additional source formats: HTML, HTM, ZIP, TXT, RTF, PDF".into(),
        MOBI_DEPRECATION_NOTICE.into(),
        String::new(),
        "Generated outputs in this package:".into(),
    ];
    lines.extend(outputs.iter().map(|label| format!("- {label}")));
    lines.extend(
        [
            "",
            "Final KDP readiness checks:",
            "1) Upload EPUB to KDP previewer and review TOC/chapter breaks.",
            "2) Confirm cover rendering, fonts, spacing, and scene breaks.",
            "3) Run a final proofread after conversion preview.",
        ]
        .map(String::from),
    );

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_kdp_lists() {
        assert_eq!(source_status(Path::new("a.DOCX")), SourceStatus::Recommended);
        assert_eq!(source_status(Path::new("a.kpf")), SourceStatus::Recommended);
        assert_eq!(source_status(Path::new("a.pdf")), SourceStatus::Accepted);
        assert_eq!(source_status(Path::new("a.mobi")), SourceStatus::Deprecated);
        assert_eq!(source_status(Path::new("a.md")), SourceStatus::Unlisted);
        assert_eq!(source_status(Path::new("noext")), SourceStatus::Unlisted);
    }

    #[test]
    fn report_layout() {
        let report = build_compliance_report(
            Path::new("/uploads/My Book.epub"),
            &["Kindle EPUB (EPUB)".to_string(), "Print PDF (PDF)".to_string()],
        );
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "KDP Submission Compliance Report");
        assert_eq!(lines[3], "Source file: My Book.epub");
        assert_eq!(lines[4], "Source extension: .epub");
        assert_eq!(lines[6], "Source format status: PASS (recommended by KDP)");
        assert_eq!(lines[10], MOBI_DEPRECATION_NOTICE);
        assert_eq!(lines[12], "Generated outputs in this package:");
        assert_eq!(lines[13], "- Kindle EPUB (EPUB)");
        assert_eq!(lines[14], "- Print PDF (PDF)");
        assert_eq!(lines[16], "Final KDP readiness checks:");
        assert!(report.ends_with("conversion preview.\n"));
    }

    #[test]
    fn missing_extension_is_spelled_out() {
        let report = build_compliance_report(Path::new("manuscript"), &[]);
        assert!(report.contains("Source extension: (none)\n"));
        assert!(report.contains("Source format status: WARN"));
    }
}
