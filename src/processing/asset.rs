//! Decoded images: the per-batch logo and the per-file targets

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use image::{ImageError, Rgba, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::error::{ErrorContext, Result, WatermarkError};

/// Decode any supported file into an RGBA buffer.
///
/// The container is sniffed from the file header first, so a mislabeled
/// extension still decodes.
fn decode_rgba(path: &Path) -> std::result::Result<RgbaImage, ImageError> {
    let image = image::io::Reader::open(path)?
        .with_guessed_format()?
        .decode()?;
    Ok(image.to_rgba8())
}

/// Fold alpha into the color channels so resampling never pulls color out
/// of fully transparent pixels.
fn premultiply(pixels: &RgbaImage) -> Rgba32FImage {
    let mut out = Rgba32FImage::new(pixels.width(), pixels.height());
    for (src, dst) in pixels.pixels().zip(out.pixels_mut()) {
        let alpha = f32::from(src[3]) / 255.0;
        let channel = |value: u8| f32::from(value) / 255.0 * alpha;
        *dst = Rgba([channel(src[0]), channel(src[1]), channel(src[2]), alpha]);
    }
    out
}

/// The watermark, normalized to RGBA once and shared read-only
#[derive(Debug, Clone)]
pub struct LogoAsset {
    path: PathBuf,
    pixels: RgbaImage,
    premultiplied: Rgba32FImage,
}

impl LogoAsset {
    /// Load and normalize the logo.
    ///
    /// A path that does not resolve yields `LogoNotFound`; anything else that
    /// prevents decoding yields `LogoLoadError`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading logo: {:?}", path);

        let pixels = decode_rgba(path).map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => {
                WatermarkError::logo_not_found(path.to_path_buf())
            }
            other => WatermarkError::logo_load(path.to_path_buf(), other.to_string()),
        })?;

        debug!("Logo ready: {}x{}", pixels.width(), pixels.height());

        Ok(Self {
            path: path.to_path_buf(),
            premultiplied: premultiply(&pixels),
            pixels,
        })
    }

    /// Wrap an already decoded buffer
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            path: PathBuf::new(),
            premultiplied: premultiply(&pixels),
            pixels,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Premultiplied float copy used as the resampling source
    pub fn premultiplied(&self) -> &Rgba32FImage {
        &self.premultiplied
    }
}

/// One input image, held only while it is being stamped
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl ImageAsset {
    /// Load one input file and normalize it to RGBA
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pixels = decode_rgba(path).load_context(path.to_path_buf())?;

        debug!("Loaded image: {:?} ({}x{})", path, pixels.width(), pixels.height());

        Ok(Self {
            path: path.to_path_buf(),
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
