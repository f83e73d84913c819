// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Container metadata probes.
//
// Decoders normalise what they hand back: CMYK JPEGs arrive as RGB, palette
// PNGs as RGB(A), and none of them report print density. Validation needs
// the file's own declarations, so these probes read the headers directly.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ColorType, ImageFormat};
use tiff::decoder::Decoder;
use tiff::decoder::ifd::Value;
use tiff::tags::Tag;
use tracing::debug;

const CM_PER_INCH: f64 = 2.54;
const INCH_PER_METRE: f64 = 0.0254;
/// Density assumed for Exif data that carries no usable resolution.
const EXIF_DEFAULT_DPI: f64 = 72.0;

/// What the container header says about an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderInfo {
    /// Declared density as (x, y) dots per inch.
    pub dpi: Option<(f64, f64)>,
    /// Colour mode the decoder would otherwise hide (`CMYK`, `P`).
    pub mode_override: Option<&'static str>,
}

/// Upper-case format name as used in compliance rules.
pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".into(),
        ImageFormat::Tiff => "TIFF".into(),
        ImageFormat::Png => "PNG".into(),
        ImageFormat::WebP => "WEBP".into(),
        ImageFormat::Gif => "GIF".into(),
        ImageFormat::Bmp => "BMP".into(),
        other => other
            .extensions_str()
            .first()
            .map_or_else(|| format!("{other:?}"), |ext| ext.to_string())
            .to_uppercase(),
    }
}

/// Colour mode name for a decoder colour type, before header overrides.
pub fn color_mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F | ColorType::Rgba32F => "F",
        _ => "UNKNOWN",
    }
}

/// Read density and hidden colour mode from the file header. Anything the
/// probe cannot parse is reported as absent rather than as an error.
pub fn probe_header(path: &Path, format: ImageFormat) -> HeaderInfo {
    let info = match format {
        ImageFormat::Tiff => probe_tiff(path),
        ImageFormat::Gif => HeaderInfo {
            dpi: None,
            mode_override: Some("P"),
        },
        ImageFormat::Jpeg | ImageFormat::Png => match std::fs::read(path) {
            Ok(bytes) if format == ImageFormat::Jpeg => probe_jpeg(&bytes),
            Ok(bytes) => probe_png(&bytes),
            Err(err) => {
                debug!(%err, "Header probe could not read file");
                HeaderInfo::default()
            }
        },
        _ => HeaderInfo::default(),
    };
    debug!(?info, "Header probed");
    info
}

/// JFIF APP0 density (falling back to Exif resolution) and the SOF
/// component count.
pub fn probe_jpeg(bytes: &[u8]) -> HeaderInfo {
    let mut info = HeaderInfo::default();
    let mut exif_dpi = None;
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return info;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            break;
        }
        let marker = bytes[pos + 1];
        // Fill bytes and standalone markers carry no length.
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        // Start of scan: headers are over.
        if marker == 0xDA || marker == 0xD9 {
            break;
        }

        let length = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        let start = pos + 4;
        let end = (pos + 2 + length).min(bytes.len());
        let segment = bytes.get(start..end).unwrap_or_default();

        match marker {
            0xE0 if info.dpi.is_none() => info.dpi = jfif_density(segment),
            0xE1 if exif_dpi.is_none() => exif_dpi = exif_density(segment),
            // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC).
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                if segment.get(5) == Some(&4) {
                    info.mode_override = Some("CMYK");
                }
            }
            _ => {}
        }
        pos += 2 + length;
    }
    if info.dpi.is_none() {
        info.dpi = exif_dpi;
    }
    info
}

/// Density from a JFIF APP0 payload: `JFIF\0`, version, units, x, y.
fn jfif_density(segment: &[u8]) -> Option<(f64, f64)> {
    if segment.len() < 12 || !segment.starts_with(b"JFIF\0") {
        return None;
    }
    let unit = segment[7];
    let x = f64::from(u16::from_be_bytes([segment[8], segment[9]]));
    let y = f64::from(u16::from_be_bytes([segment[10], segment[11]]));
    match unit {
        1 => Some((x, y)),
        2 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        // Unit 0 is an aspect ratio, not a density.
        _ => None,
    }
}

/// Density from an Exif APP1 payload. XResolution is used for both axes and
/// scaled when ResolutionUnit is centimetres. Exif without readable
/// resolution tags counts as 72 DPI; a non-Exif APP1 yields nothing.
fn exif_density(segment: &[u8]) -> Option<(f64, f64)> {
    let tiff = segment.strip_prefix(b"Exif\0\0")?;
    let dpi = exif_x_resolution(tiff).unwrap_or(EXIF_DEFAULT_DPI);
    Some((dpi, dpi))
}

/// XResolution in dots per inch from IFD0 of an Exif TIFF block. Requires
/// ResolutionUnit to be present.
fn exif_x_resolution(tiff: &[u8]) -> Option<f64> {
    let big_endian = match tiff.get(..2)? {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };
    let u16_at = |at: usize| -> Option<u16> {
        let b: [u8; 2] = tiff.get(at..at + 2)?.try_into().ok()?;
        Some(if big_endian { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) })
    };
    let u32_at = |at: usize| -> Option<u32> {
        let b: [u8; 4] = tiff.get(at..at + 4)?.try_into().ok()?;
        Some(if big_endian { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) })
    };

    let ifd = usize::try_from(u32_at(4)?).ok()?;
    let mut unit = None;
    let mut x_resolution = None;
    for index in 0..usize::from(u16_at(ifd)?) {
        let entry = ifd + 2 + index * 12;
        let kind = u16_at(entry + 2)?;
        match u16_at(entry)? {
            0x0128 => {
                unit = match kind {
                    3 => u16_at(entry + 8).map(u32::from),
                    4 => u32_at(entry + 8),
                    _ => None,
                };
            }
            0x011A if kind == 5 => {
                let at = usize::try_from(u32_at(entry + 8)?).ok()?;
                let (numerator, denominator) = (u32_at(at)?, u32_at(at + 4)?);
                if denominator != 0 {
                    x_resolution = Some(f64::from(numerator) / f64::from(denominator));
                }
            }
            _ => {}
        }
    }

    let (unit, x_resolution) = (unit?, x_resolution?);
    Some(if unit == 3 { x_resolution * CM_PER_INCH } else { x_resolution })
}

/// `pHYs` density and the IHDR colour type.
pub fn probe_png(bytes: &[u8]) -> HeaderInfo {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    let mut info = HeaderInfo::default();
    if !bytes.starts_with(SIGNATURE) {
        return info;
    }

    let mut pos = SIGNATURE.len();
    while pos + 8 <= bytes.len() {
        let length = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
            as usize;
        let kind = &bytes[pos + 4..pos + 8];
        let Some(data) = bytes.get(pos + 8..pos + 8 + length) else {
            break;
        };

        match kind {
            b"IHDR" if data.len() >= 10 => {
                if data[9] == 3 {
                    info.mode_override = Some("P");
                }
            }
            b"pHYs" if data.len() >= 9 => {
                let x = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                let y = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
                if data[8] == 1 {
                    info.dpi = Some((
                        f64::from(x) * INCH_PER_METRE,
                        f64::from(y) * INCH_PER_METRE,
                    ));
                }
            }
            b"IDAT" | b"IEND" => break,
            _ => {}
        }
        // length + type + data + crc
        pos += 12 + length;
    }
    info
}

/// X/YResolution with ResolutionUnit, and photometric interpretation, from
/// the first IFD.
fn probe_tiff(path: &Path) -> HeaderInfo {
    let mut info = HeaderInfo::default();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!(%err, "TIFF probe could not open file");
            return info;
        }
    };
    let mut decoder = match Decoder::new(BufReader::new(file)) {
        Ok(decoder) => decoder,
        Err(err) => {
            debug!(%err, "TIFF probe could not read header");
            return info;
        }
    };

    let mut tag_number = |tag: Tag| -> Option<f64> {
        decoder.find_tag(tag).ok().flatten().as_ref().and_then(value_as_f64)
    };

    // Absent unit means inch; 1 means "no absolute unit".
    let scale = match tag_number(Tag::ResolutionUnit).map(|unit| unit as u32) {
        None | Some(2) => Some(1.0),
        Some(3) => Some(CM_PER_INCH),
        _ => None,
    };
    let x = tag_number(Tag::XResolution);
    let y = tag_number(Tag::YResolution);
    if let (Some(scale), Some(x), Some(y)) = (scale, x, y) {
        info.dpi = Some((x * scale, y * scale));
    }

    info.mode_override = match tag_number(Tag::PhotometricInterpretation).map(|p| p as u32) {
        Some(3) => Some("P"),
        Some(5) => Some("CMYK"),
        _ => None,
    };
    info
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Byte(v) => Some(f64::from(*v)),
        Value::Short(v) => Some(f64::from(*v)),
        Value::Unsigned(v) => Some(f64::from(*v)),
        Value::Float(v) => Some(f64::from(*v)),
        Value::Double(v) => Some(*v),
        Value::Rational(n, d) if *d != 0 => Some(f64::from(*n) / f64::from(*d)),
        Value::List(values) => values.first().and_then(value_as_f64),
        _ => None,
    }
}
