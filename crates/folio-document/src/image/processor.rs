// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, colour conversion, downscale-to-fit, letterboxing
// and JPEG output with density metadata. Operates on in-memory images using
// the `image` crate.

use std::path::Path;

use folio_core::error::FolioError;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage};
use tracing::{debug, info, instrument};

/// What an image header declares, read without decoding any pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
}

/// Image processing pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so a
/// correction reads as a chain:
///
/// ```ignore
/// ImageProcessor::open("cover.png")?
///     .into_rgb()
///     .fit_within(1600, 2560)
///     .letterbox(1600, 2560, [248, 248, 248])
///     .save_jpeg("out.jpg", 95, Some(72))?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file. The format is taken from the file content, not
    /// the extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let path = path.as_ref();
        let (reader, format) = sniffed_reader(path)?;
        let image = reader.decode().map_err(|err| {
            FolioError::ImageError(format!("failed to decode {}: {}", path.display(), err))
        })?;
        info!(width = image.width(), height = image.height(), ?format, "Image loaded");
        Ok(Self { image })
    }

    /// Read format, dimensions and colour type from the header only, so
    /// images too large to decode can still be measured.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn inspect(path: impl AsRef<Path>) -> Result<ImageHeader, FolioError> {
        let path = path.as_ref();
        let (reader, format) = sniffed_reader(path)?;
        let decoder = reader.into_decoder().map_err(|err| {
            FolioError::ImageError(format!("failed to read {}: {}", path.display(), err))
        })?;
        let (width, height) = decoder.dimensions();
        let header = ImageHeader {
            format,
            width,
            height,
            color: decoder.color_type(),
        };
        debug!(?header, "Image header read");
        Ok(header)
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let image = image::load_from_memory(data)
            .map_err(|err| FolioError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(width = image.width(), height = image.height(), "Image decoded from bytes");
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Convert to 8-bit RGB. Alpha is discarded, not composited.
    pub fn into_rgb(self) -> Self {
        match self.image {
            DynamicImage::ImageRgb8(_) => self,
            other => Self {
                image: DynamicImage::ImageRgb8(other.to_rgb8()),
            },
        }
    }

    /// Scale down, preserving aspect ratio, until the image fits within
    /// `max_width` x `max_height`. Images that already fit are returned
    /// untouched; this never enlarges. Uses Lanczos3 filtering.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn fit_within(self, max_width: u32, max_height: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        if width <= max_width && height <= max_height {
            debug!(width, height, "Image already fits, no resize");
            return self;
        }

        info!(from_w = width, from_h = height, max_width, max_height, "Downscaling image");
        let resized = self.image.resize(max_width, max_height, FilterType::Lanczos3);
        debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
        Self { image: resized }
    }

    /// Centre the image on an opaque `width` x `height` canvas of `fill`.
    ///
    /// The image must already fit; anything overhanging the canvas is
    /// clipped. The result is always RGB.
    #[instrument(skip(self), fields(width, height))]
    pub fn letterbox(self, width: u32, height: u32, fill: [u8; 3]) -> Self {
        let content = self.image.to_rgb8();
        let mut canvas = RgbImage::from_pixel(width, height, Rgb(fill));
        let x = (i64::from(width) - i64::from(content.width())) / 2;
        let y = (i64::from(height) - i64::from(content.height())) / 2;
        imageops::overlay(&mut canvas, &content, x, y);
        debug!(x, y, "Image centred on canvas");
        Self {
            image: DynamicImage::ImageRgb8(canvas),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode as baseline JPEG at `quality` (1-100). With `dpi`, the JFIF
    /// header declares that density on both axes.
    pub fn to_jpeg_bytes(&self, quality: u8, dpi: Option<u16>) -> Result<Vec<u8>, FolioError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        if let Some(dpi) = dpi {
            encoder.set_pixel_density(PixelDensity::dpi(dpi));
        }
        rgb.write_with_encoder(encoder)
            .map_err(|err| FolioError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to `path` as JPEG.
    pub fn save_jpeg(
        &self,
        path: impl AsRef<Path>,
        quality: u8,
        dpi: Option<u16>,
    ) -> Result<(), FolioError> {
        let bytes = self.to_jpeg_bytes(quality, dpi)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

/// Open `path` with its format sniffed from the content.
fn sniffed_reader(
    path: &Path,
) -> Result<(ImageReader<std::io::BufReader<std::fs::File>>, ImageFormat), FolioError> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| {
            FolioError::ImageError(format!("failed to open {}: {}", path.display(), err))
        })?;
    let format = reader.format().ok_or_else(|| {
        FolioError::ImageError(format!("cannot identify image file {}", path.display()))
    })?;
    Ok((reader, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(width: u32, height: u32) -> ImageProcessor {
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([10, 20, 30]),
        )))
    }

    #[test]
    fn small_images_are_never_enlarged() {
        let fitted = solid(100, 150).fit_within(1600, 2560);
        assert_eq!((fitted.width(), fitted.height()), (100, 150));
    }

    #[test]
    fn large_images_shrink_preserving_ratio() {
        let fitted = solid(3200, 2560).fit_within(1600, 2560);
        assert_eq!((fitted.width(), fitted.height()), (1600, 1280));
    }

    #[test]
    fn letterbox_centres_content() {
        let boxed = solid(2, 2).letterbox(6, 4, [248, 248, 248]);
        let rgb = boxed.as_dynamic().as_rgb8().unwrap();
        assert_eq!(rgb.dimensions(), (6, 4));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([248, 248, 248]));
        assert_eq!(rgb.get_pixel(2, 1), &Rgb([10, 20, 30]));
        assert_eq!(rgb.get_pixel(3, 2), &Rgb([10, 20, 30]));
        assert_eq!(rgb.get_pixel(4, 1), &Rgb([248, 248, 248]));
    }

    #[test]
    fn rgba_converts_to_rgb() {
        let rgba = RgbaImage::from_pixel(3, 3, image::Rgba([1, 2, 3, 0]));
        let rgb = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(rgba)).into_rgb();
        assert!(matches!(rgb.as_dynamic(), DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn jpeg_output_round_trips_dimensions() {
        let bytes = solid(40, 64).to_jpeg_bytes(95, Some(72)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = ImageProcessor::from_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 64));
    }

    #[test]
    fn inspect_reads_header_without_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        DynamicImage::ImageRgba8(RgbaImage::new(30, 50)).save(&path).unwrap();

        let header = ImageProcessor::inspect(&path).unwrap();
        assert_eq!(header.format, ImageFormat::Png);
        assert_eq!((header.width, header.height), (30, 50));
        assert_eq!(header.color, ColorType::Rgba8);
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        let err = ImageProcessor::from_bytes(b"nope").err().unwrap();
        assert!(matches!(err, FolioError::ImageError(_)));
    }
}
