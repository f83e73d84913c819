// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Defaults describe the KDP eBook targets; a JSON file
// can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level settings handed to the parser and the cover pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Cover image compliance target.
    pub cover: CoverTarget,
    /// Legacy document converter settings.
    pub converter: ConverterConfig,
}

impl FolioConfig {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}

/// Numeric and format constraints a cover image must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverTarget {
    /// Accepted container formats, upper-case (`JPEG`, `TIFF`).
    pub allowed_formats: Vec<String>,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Minimum height/width ratio.
    pub min_ratio: f64,
    pub required_dpi: f64,
    /// Allowed deviation from `required_dpi` on either axis.
    pub dpi_tolerance: f64,
    /// Files must be strictly smaller than this.
    pub max_size_mb: f64,
    /// Heights below this trigger the HD-quality warning.
    pub hd_min_height: u32,
    /// Letterbox background used by the auto-corrector.
    pub canvas_fill: [u8; 3],
    /// JPEG quality used by the auto-corrector (1-100).
    pub jpeg_quality: u8,
    /// Marketplace help page cited in reports.
    pub help_url: String,
}

impl Default for CoverTarget {
    fn default() -> Self {
        Self {
            allowed_formats: vec!["JPEG".into(), "TIFF".into()],
            ideal_width: 1600,
            ideal_height: 2560,
            min_width: 625,
            min_height: 1000,
            max_width: 10_000,
            max_height: 10_000,
            min_ratio: 1.6,
            required_dpi: 72.0,
            dpi_tolerance: 1.0,
            max_size_mb: 50.0,
            hd_min_height: 2500,
            canvas_fill: [248, 248, 248],
            jpeg_quality: 95,
            help_url: "https://kdp.amazon.com/en_US/help/topic/G200645690".into(),
        }
    }
}

impl CoverTarget {
    /// Whether `format` (upper-case name) is an accepted container.
    pub fn allows_format(&self, format: &str) -> bool {
        self.allowed_formats
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(format))
    }
}

/// Settings for the external legacy-document converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Program name or absolute path of the office suite binary.
    pub program: String,
    /// Hard limit on a single conversion.
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "soffice".into(),
            timeout_secs: 120,
        }
    }
}
