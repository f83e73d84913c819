// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

use crate::types::CoverRole;

/// Top-level error type for all Folio operations.
///
/// Every variant is a recoverable, caller-visible failure. The human-readable
/// detail travels as a field so callers can match on the kind and still show
/// the message verbatim.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Manuscript errors --
    #[error("unsupported manuscript format: {0}")]
    UnsupportedFormat(String),

    #[error("deprecated manuscript format: {0}")]
    DeprecatedFormat(String),

    #[error("pass-through format: {0}")]
    PassThroughFormat(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("The manuscript appears empty after parsing.")]
    EmptyManuscript,

    // -- Cover errors --
    #[error("{role} image is unreadable: {detail}")]
    ImageUnreadable { role: CoverRole, detail: String },

    #[error("{role} cover does not meet KDP specs: {}", .violations.join("; "))]
    ImageNonCompliant {
        role: CoverRole,
        violations: Vec<String>,
    },

    #[error("{role} cover auto-correction failed to meet KDP specs: {}", .after.join("; "))]
    AutoCorrectionFailed {
        role: CoverRole,
        before: Vec<String>,
        after: Vec<String>,
    },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Human-readable detail without the kind prefix, suitable for showing
    /// to the person who uploaded the file.
    pub fn detail(&self) -> String {
        match self {
            Self::UnsupportedFormat(msg)
            | Self::DeprecatedFormat(msg)
            | Self::PassThroughFormat(msg)
            | Self::ExtractionFailed(msg)
            | Self::ImageError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
