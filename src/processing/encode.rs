//! Writing composited images

use std::fs;
use std::io::Cursor;
use std::path::Path;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, RgbaImage};
use tracing::debug;

use crate::error::{ErrorContext, Result};
use crate::processing::formats::{detect_format_from_path, ImageFormat, OutputEncoding};

/// Default JPEG quality (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encodes RGBA buffers to disk, flattening when the target can't hold alpha
#[derive(Debug, Clone, Copy)]
pub struct OutputEncoder {
    jpeg_quality: u8,
}

impl OutputEncoder {
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality, clamped to 1-100
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Write `pixels` to `output_path`.
    ///
    /// The encoding depends only on the output filename: `.png` keeps the
    /// alpha channel, everything else is written as RGB. The image is encoded
    /// in memory first, so a failed encode leaves no file behind.
    pub fn write(&self, pixels: &RgbaImage, output_path: &Path) -> Result<()> {
        let format = detect_format_from_path(output_path)?;
        let encoding = OutputEncoding::for_path(output_path);

        debug!("Encoding {:?} as {:?} ({:?})", output_path, format, encoding);

        let (width, height) = pixels.dimensions();
        let mut writer = Cursor::new(Vec::new());

        match (encoding, format) {
            (OutputEncoding::Rgba, _) => {
                image::write_buffer_with_format(
                    &mut writer,
                    pixels.as_raw(),
                    width,
                    height,
                    ColorType::Rgba8,
                    image::ImageFormat::from(format),
                )
                .write_context(output_path.to_path_buf())?;
            }
            (OutputEncoding::Rgb, ImageFormat::Jpeg) => {
                let rgb = flatten(pixels);
                let encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
                DynamicImage::ImageRgb8(rgb)
                    .write_with_encoder(encoder)
                    .write_context(output_path.to_path_buf())?;
            }
            (OutputEncoding::Rgb, _) => {
                let rgb = flatten(pixels);
                image::write_buffer_with_format(
                    &mut writer,
                    rgb.as_raw(),
                    width,
                    height,
                    ColorType::Rgb8,
                    image::ImageFormat::from(format),
                )
                .write_context(output_path.to_path_buf())?;
            }
        }

        fs::write(output_path, writer.into_inner()).write_context(output_path.to_path_buf())?;

        Ok(())
    }
}

impl Default for OutputEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop the alpha channel, keeping the composited RGB values as-is
pub fn flatten(pixels: &RgbaImage) -> image::RgbImage {
    DynamicImage::ImageRgba8(pixels.clone()).to_rgb8()
}
