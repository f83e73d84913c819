// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover image validation against a `CoverTarget`.

use std::path::Path;

use folio_core::config::CoverTarget;
use folio_core::types::CoverRole;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::image::ImageProcessor;
use crate::image::probe::{color_mode_name, format_name, probe_header};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One rule a cover is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverCheck {
    /// The file could not be decoded at all.
    Decode,
    Format,
    MinSize,
    MaxSize,
    AspectRatio,
    DpiMissing,
    DpiValue,
    FileSize,
    ColorMode,
    IdealDimensions,
    HdHeight,
}

impl CoverCheck {
    /// Warnings are advice; they never make a cover invalid.
    pub fn is_warning(self) -> bool {
        matches!(self, Self::IdealDimensions | Self::HdHeight)
    }
}

/// A failed check with its rendered explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverFinding {
    pub check: CoverCheck,
    pub message: String,
}

/// Outcome of validating one cover image.
///
/// `valid` is exactly "no errors"; warnings never affect it. Measurements
/// are absent only when the image could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverValidationResult {
    valid: bool,
    errors: Vec<CoverFinding>,
    warnings: Vec<CoverFinding>,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<String>,
    color_mode: Option<String>,
    dpi: Option<(f64, f64)>,
    size_mb: Option<f64>,
    #[serde(skip)]
    unreadable: Option<String>,
}

impl CoverValidationResult {
    fn unreadable(role: CoverRole, detail: String) -> Self {
        Self {
            valid: false,
            errors: vec![CoverFinding {
                check: CoverCheck::Decode,
                message: format!("{role} image is unreadable: {detail}"),
            }],
            warnings: Vec::new(),
            width: None,
            height: None,
            format: None,
            color_mode: None,
            dpi: None,
            size_mb: None,
            unreadable: Some(detail),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[CoverFinding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[CoverFinding] {
        &self.warnings
    }

    /// Error messages in check order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|f| f.message.clone()).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|f| f.message.clone()).collect()
    }

    /// True when `check` produced an error or a warning.
    pub fn flagged(&self, check: CoverCheck) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|finding| finding.check == check)
    }

    /// Decoder detail when the image could not be read at all.
    pub fn unreadable_detail(&self) -> Option<&str> {
        self.unreadable.as_deref()
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn color_mode(&self) -> Option<&str> {
        self.color_mode.as_deref()
    }

    pub fn dpi(&self) -> Option<(f64, f64)> {
        self.dpi
    }

    pub fn size_mb(&self) -> Option<f64> {
        self.size_mb
    }
}

/// Measured properties of a cover.
struct Measurements {
    width: u32,
    height: u32,
    format: String,
    color_mode: String,
    dpi: Option<(f64, f64)>,
    size_mb: Option<f64>,
}

/// Validate the image at `path` against `target`.
///
/// Only the header is read, so images too large to decode are still
/// measured. Never fails: an unreadable header yields an invalid result with
/// a single `Decode` error. Otherwise every check runs so all problems are
/// reported together.
#[instrument(skip(target), fields(path = %path.display()))]
pub fn validate(path: &Path, role: CoverRole, target: &CoverTarget) -> CoverValidationResult {
    let image = match ImageProcessor::inspect(path) {
        Ok(image) => image,
        Err(err) => {
            debug!(%err, "Cover could not be decoded");
            return CoverValidationResult::unreadable(role, err.detail());
        }
    };

    let header = probe_header(path, image.format);
    let color_mode = header
        .mode_override
        .unwrap_or_else(|| color_mode_name(image.color));
    let measured = Measurements {
        width: image.width,
        height: image.height,
        format: format_name(image.format),
        color_mode: color_mode.to_string(),
        dpi: header.dpi,
        size_mb: std::fs::metadata(path)
            .ok()
            .map(|meta| meta.len() as f64 / BYTES_PER_MB),
    };

    let (errors, warnings): (Vec<_>, Vec<_>) = run_checks(&measured, target)
        .into_iter()
        .partition(|finding| !finding.check.is_warning());

    let result = CoverValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
        width: Some(measured.width),
        height: Some(measured.height),
        format: Some(measured.format),
        color_mode: Some(measured.color_mode),
        dpi: measured.dpi,
        size_mb: measured.size_mb,
        unreadable: None,
    };
    info!(
        role = role.as_str(),
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Cover validated"
    );
    result
}

/// Every check, in reporting order.
fn run_checks(m: &Measurements, target: &CoverTarget) -> Vec<CoverFinding> {
    let mut findings = Vec::new();
    let mut flag = |check: CoverCheck, message: String| findings.push(CoverFinding { check, message });

    if !target.allows_format(&m.format) {
        flag(
            CoverCheck::Format,
            format!(
                "Format must be {}. Uploaded format is {}.",
                target.allowed_formats.join(" or "),
                if m.format.is_empty() { "unknown" } else { m.format.as_str() }
            ),
        );
    }

    if m.width < target.min_width || m.height < target.min_height {
        flag(
            CoverCheck::MinSize,
            format!(
                "Dimensions are too small: {}x{}. Minimum is {}x{} (W x H).",
                m.width, m.height, target.min_width, target.min_height
            ),
        );
    }

    if m.width > target.max_width || m.height > target.max_height {
        flag(
            CoverCheck::MaxSize,
            format!(
                "Dimensions are too large: {}x{}. Maximum is {}x{} (W x H).",
                m.width, m.height, target.max_width, target.max_height
            ),
        );
    }

    let ratio = if m.width == 0 {
        0.0
    } else {
        f64::from(m.height) / f64::from(m.width)
    };
    if ratio < target.min_ratio {
        flag(
            CoverCheck::AspectRatio,
            format!(
                "Height/width ratio must be at least {}:1. Current ratio is {:.3}:1.",
                target.min_ratio, ratio
            ),
        );
    }

    match m.dpi {
        None => flag(
            CoverCheck::DpiMissing,
            format!(
                "DPI metadata is missing. KDP eBook covers require {} DPI.",
                target.required_dpi
            ),
        ),
        Some((x, y)) => {
            let off = |v: f64| (v - target.required_dpi).abs() > target.dpi_tolerance;
            if off(x) || off(y) {
                flag(
                    CoverCheck::DpiValue,
                    format!(
                        "DPI must be {}. Current DPI is approximately {:.1}x{:.1}.",
                        target.required_dpi, x, y
                    ),
                );
            }
        }
    }

    if let Some(size_mb) = m.size_mb {
        if size_mb >= target.max_size_mb {
            flag(
                CoverCheck::FileSize,
                format!(
                    "File size must be below {}MB. Current size is {:.2}MB.",
                    target.max_size_mb, size_mb
                ),
            );
        }
    }

    if m.color_mode != "RGB" {
        flag(
            CoverCheck::ColorMode,
            format!("Color mode must be RGB. Current mode is {}.", m.color_mode),
        );
    }

    if m.width != target.ideal_width || m.height != target.ideal_height {
        flag(
            CoverCheck::IdealDimensions,
            format!(
                "Ideal dimensions are {}x{} (W x H). Current is {}x{}.",
                target.ideal_width, target.ideal_height, m.width, m.height
            ),
        );
    }

    if m.height < target.hd_min_height {
        flag(
            CoverCheck::HdHeight,
            format!(
                "For best quality on HD devices, KDP recommends cover height of at least {}px.",
                target.hd_min_height
            ),
        );
    }

    findings
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Write;

    /// Write a flat RGB JPEG declaring `dpi`.
    pub(crate) fn write_jpeg(path: &Path, width: u32, height: u32, dpi: Option<u16>) {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 40, 20])));
        ImageProcessor::from_dynamic(image)
            .save_jpeg(path, 90, dpi)
            .unwrap();
    }

    /// A PNG whose header declares `width` x `height` RGBA while its pixel
    /// data holds only a few bytes.
    fn write_png_header(path: &Path, width: u32, height: u32) {
        fn chunk(out: &mut Vec<u8>, kind: &[u8], data: &[u8]) {
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(kind);
            out.extend_from_slice(data);
            let mut crc = flate2::Crc::new();
            crc.update(kind);
            crc.update(data);
            out.extend_from_slice(&crc.sum().to_be_bytes());
        }

        let mut ihdr = width.to_be_bytes().to_vec();
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
        let mut idat =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        idat.write_all(&[0; 64]).unwrap();
        let idat = idat.finish().unwrap();

        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        chunk(&mut bytes, b"IHDR", &ihdr);
        chunk(&mut bytes, b"IDAT", &idat);
        chunk(&mut bytes, b"IEND", &[]);
        std::fs::write(path, bytes).unwrap();
    }

    fn checks(findings: &[CoverFinding]) -> Vec<CoverCheck> {
        findings.iter().map(|f| f.check).collect()
    }

    #[test]
    fn compliant_jpeg_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        write_jpeg(&path, 800, 1280, Some(72));

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert!(result.is_valid(), "{:?}", result.errors());
        assert_eq!(result.format(), Some("JPEG"));
        assert_eq!(result.color_mode(), Some("RGB"));
        assert_eq!(result.dpi(), Some((72.0, 72.0)));
        assert_eq!((result.width(), result.height()), (Some(800), Some(1280)));
        assert_eq!(
            checks(result.warnings()),
            vec![CoverCheck::IdealDimensions, CoverCheck::HdHeight]
        );
    }

    #[test]
    fn wrong_dpi_fails_only_dpi_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        write_jpeg(&path, 800, 1280, Some(96));

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert!(!result.is_valid());
        assert_eq!(checks(result.errors()), vec![CoverCheck::DpiValue]);
        assert_eq!(
            result.errors()[0].message,
            "DPI must be 72. Current DPI is approximately 96.0x96.0."
        );
    }

    #[test]
    fn minimum_size_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let target = CoverTarget::default();

        let at_min = dir.path().join("min.jpg");
        write_jpeg(&at_min, 625, 1000, Some(72));
        let result = validate(&at_min, CoverRole::Back, &target);
        assert!(!result.flagged(CoverCheck::MinSize));
        assert!(!result.flagged(CoverCheck::MaxSize));
        assert!(result.is_valid());

        let below = dir.path().join("below.jpg");
        write_jpeg(&below, 624, 1000, Some(72));
        let result = validate(&below, CoverRole::Back, &target);
        assert_eq!(checks(result.errors()), vec![CoverCheck::MinSize]);
        assert_eq!(
            result.errors()[0].message,
            "Dimensions are too small: 624x1000. Minimum is 625x1000 (W x H)."
        );
    }

    #[test]
    fn ideal_size_has_no_dimension_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ideal.jpg");
        write_jpeg(&path, 1600, 2560, Some(72));

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn all_applicable_checks_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        DynamicImage::ImageRgba8(image::RgbaImage::new(300, 200))
            .save(&path)
            .unwrap();

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert_eq!(
            checks(result.errors()),
            vec![
                CoverCheck::Format,
                CoverCheck::MinSize,
                CoverCheck::AspectRatio,
                CoverCheck::DpiMissing,
                CoverCheck::ColorMode,
            ]
        );
        assert_eq!(
            result.errors()[0].message,
            "Format must be JPEG or TIFF. Uploaded format is PNG."
        );
        assert_eq!(
            result.errors()[2].message,
            "Height/width ratio must be at least 1.6:1. Current ratio is 0.667:1."
        );
        assert_eq!(result.color_mode(), Some("RGBA"));
    }

    #[test]
    fn unreadable_image_is_a_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        let result = validate(&path, CoverRole::Back, &CoverTarget::default());
        assert!(!result.is_valid());
        assert_eq!(checks(result.errors()), vec![CoverCheck::Decode]);
        assert!(result.errors()[0].message.starts_with("Back image is unreadable: "));
        assert!(result.unreadable_detail().is_some());
        assert_eq!(result.width(), None);
    }

    #[test]
    fn exif_resolution_satisfies_dpi_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phone.jpg");
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(800, 1280, Rgb([90, 40, 20])));
        let encoded = ImageProcessor::from_dynamic(image).to_jpeg_bytes(90, None).unwrap();
        let mut bytes = encoded[..2].to_vec();
        bytes.extend(crate::image::probe::tests::exif_app1(Some((72, 1)), Some(2)));
        bytes.extend_from_slice(&encoded[2..]);
        std::fs::write(&path, bytes).unwrap();

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert_eq!(result.dpi(), Some((72.0, 72.0)));
        assert!(!result.flagged(CoverCheck::DpiMissing));
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn oversized_image_is_measured_from_its_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        write_png_header(&path, 10_001, 15_000);

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert_eq!(result.unreadable_detail(), None);
        assert!(!result.flagged(CoverCheck::Decode));
        assert_eq!((result.width(), result.height()), (Some(10_001), Some(15_000)));
        assert!(result.flagged(CoverCheck::MaxSize));
        assert_eq!(result.color_mode(), Some("RGBA"));
    }

    #[test]
    fn tiff_is_an_allowed_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.tif");
        DynamicImage::ImageRgb8(RgbImage::new(625, 1000)).save(&path).unwrap();

        let result = validate(&path, CoverRole::Front, &CoverTarget::default());
        assert_eq!(result.format(), Some("TIFF"));
        assert!(!result.flagged(CoverCheck::Format));
        assert_eq!(result.color_mode(), Some("RGB"));
    }

    #[test]
    fn targets_can_be_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        write_jpeg(&path, 800, 1280, Some(300));

        let target = CoverTarget {
            required_dpi: 300.0,
            hd_min_height: 1000,
            ..CoverTarget::default()
        };
        let result = validate(&path, CoverRole::Front, &target);
        assert!(result.is_valid());
        assert_eq!(checks(result.warnings()), vec![CoverCheck::IdealDimensions]);
    }
}
