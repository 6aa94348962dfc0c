//! Image format detection and handling

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Result, WatermarkError};

/// Image formats the batch reads and writes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl ImageFormat {
    /// Whether the container can carry an alpha channel through the encoder
    pub fn supports_alpha(self) -> bool {
        matches!(self, Self::Png)
    }
}

/// How pixel data is laid out when it reaches the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// Keep all four channels
    Rgba,
    /// Drop alpha; RGB already holds the composited colors
    Rgb,
}

impl OutputEncoding {
    /// Pick the encoding from the output filename alone.
    ///
    /// Only a `.png` suffix (any case) keeps transparency. The input file's
    /// original format plays no part in this.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        match detect_format_from_path(path) {
            Ok(format) if format.supports_alpha() => Self::Rgba,
            _ => Self::Rgb,
        }
    }
}

/// Detect image format from file extension
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ImageFormat> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| WatermarkError::unsupported_format(
            "Unknown".to_string(),
            Some(path.to_path_buf())
        ))?;

    match extension.to_lowercase().as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "bmp" => Ok(ImageFormat::Bmp),
        "gif" => Ok(ImageFormat::Gif),
        _ => Err(WatermarkError::unsupported_format(
            extension.to_string(),
            Some(path.to_path_buf())
        )),
    }
}

/// Convert our ImageFormat to image crate format
impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

/// Get supported input extensions
pub fn supported_input_formats() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "bmp", "gif"]
}

/// Check if a file extension is supported for input
pub fn is_supported_input_format(extension: &str) -> bool {
    supported_input_formats()
        .iter()
        .any(|&fmt| fmt.eq_ignore_ascii_case(extension))
}
