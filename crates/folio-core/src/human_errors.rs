// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for authors uploading manuscripts and covers.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the caller presents the problem.

use crate::error::FolioError;

/// Severity of an error from the author's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A local hiccup (disk, temporary file); trying again may work.
    Transient,
    /// The author must change something (re-save, re-export, enable auto-fix).
    ActionRequired,
    /// The input can never go through this pipeline as-is.
    Permanent,
    /// Not a failure: the file skips reflow and is delivered unchanged.
    PassThrough,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the author should try (shown as body text).
    pub suggestion: String,
    /// Whether simply retrying could help.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError` an author can act on.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        // -- Manuscript errors --
        FolioError::UnsupportedFormat(detail) => HumanError {
            message: "This manuscript file type isn't supported.".into(),
            suggestion: detail.clone(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::DeprecatedFormat(detail) => HumanError {
            message: "This manuscript format has been retired by KDP.".into(),
            suggestion: detail.clone(),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::PassThroughFormat(detail) => HumanError {
            message: "This file is already KDP-ready.".into(),
            suggestion: format!("{detail} It will be delivered unchanged."),
            retriable: false,
            severity: Severity::PassThrough,
        },

        FolioError::ExtractionFailed(detail) => humanize_extraction_error(detail),

        FolioError::EmptyManuscript => HumanError {
            message: "We couldn't find any text in this manuscript.".into(),
            suggestion: "Check the file opens and contains text, then upload it again. DOCX or EPUB gives the best results.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Cover errors --
        FolioError::ImageUnreadable { role, .. } => HumanError {
            message: format!("The {} cover image couldn't be opened.", role.as_str()),
            suggestion: "The image may be damaged or in an unusual format. Re-export it as a JPEG and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::ImageNonCompliant { role, violations } => HumanError {
            message: format!("The {} cover doesn't meet KDP specs.", role.as_str()),
            suggestion: format!(
                "{} Enable auto-correction to fix this automatically.",
                violations.join(" ")
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::AutoCorrectionFailed { role, after, .. } => HumanError {
            message: format!("We couldn't automatically fix the {} cover.", role.as_str()),
            suggestion: format!(
                "{} Please prepare a 1600x2560 RGB JPEG at 72 DPI and upload it again.",
                after.join(" ")
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::ImageError(_) => HumanError {
            message: "There was a problem writing the corrected cover.".into(),
            suggestion: "Try again. If this keeps happening, upload a JPEG cover instead.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- I/O --
        FolioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read or write that file.".into(),
                    suggestion: "Check the file permissions, or copy the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        FolioError::Serialization(_) => HumanError {
            message: "A settings or data file couldn't be read.".into(),
            suggestion: "Check the configuration file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Extraction failures share one kind; the sub-case lives in the detail text.
fn humanize_extraction_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("libreoffice") || lower.contains("timed out") {
        HumanError {
            message: "This server can't convert .doc files right now.".into(),
            suggestion: detail.to_string(),
            retriable: lower.contains("timed out"),
            severity: Severity::ActionRequired,
        }
    } else if lower.starts_with("cannot open ") {
        HumanError {
            message: "The manuscript file couldn't be opened.".into(),
            suggestion: format!("Check the file exists and is readable, then try again. (Detail: {detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("no text") || lower.contains("at least one") || lower.contains("readable content") {
        HumanError {
            message: "We couldn't find usable text in this file.".into(),
            suggestion: detail.to_string(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "This manuscript file looks damaged.".into(),
            suggestion: format!("Open it on a computer to check it works, then re-save and upload again. (Detail: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}
